//! Exit codes.
//!
//! Warnings (with `--status`) and a refused major-version tag are independent
//! signals. When both hold, the exit code is the least common multiple of
//! their codes, so 2 and 3 give 6 and a script can test either with `%`.

/// Success
pub const OK: i32 = 0;
/// Any error other than the signals below
pub const FAILURE: i32 = 1;
/// Warnings were reported and `--status` was given
pub const WARNINGS: i32 = 2;
/// A new major-version tag was not added
pub const MAJOR_BUMP_REFUSED: i32 = 3;

/// What happened during one invocation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStatus {
    pub failed: bool,
    pub warnings: usize,
    pub major_bump_refused: bool,
}

impl RunStatus {
    /// A failure wins over the signal codes.
    pub fn exit_code(&self, status_flag: bool) -> i32 {
        if self.failed {
            return FAILURE;
        }
        let mut code = OK;
        if status_flag && self.warnings > 0 {
            code = combine(code, WARNINGS);
        }
        if self.major_bump_refused {
            code = combine(code, MAJOR_BUMP_REFUSED);
        }
        code
    }
}

/// Joins two signal codes; 0 means "no signal".
pub fn combine(a: i32, b: i32) -> i32 {
    match (a, b) {
        (0, x) | (x, 0) => x,
        (a, b) => lcm(a, b),
    }
}

fn lcm(a: i32, b: i32) -> i32 {
    a / gcd(a, b) * b
}

fn gcd(mut a: i32, mut b: i32) -> i32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

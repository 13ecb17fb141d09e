//! CLI Exit Code Registry
//!
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Meaning                                      |
//! |------|----------------------------------------------|
//! | 0    | Success (a trigger region or query was found) |
//! | 1    | No active trigger region in the text         |
//! | 2    | CLI usage error (bad args, bad trigger)      |
//! | 3    | I/O error (stdin, stdout)                    |
//! | 4    | Settings file could not be read or is invalid |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// No match. Like `grep(1)`, exit 1 means "nothing found", not a failure.
pub const EXIT_NO_MATCH: u8 = 1;

/// Usage error - bad arguments, invalid trigger characters.
pub const EXIT_USAGE: u8 = 2;

/// Reading input or writing output failed.
pub const EXIT_IO: u8 = 3;

/// Settings file missing (when given explicitly), unparseable, or invalid.
pub const EXIT_CONFIG: u8 = 4;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct() {
        let codes = [EXIT_SUCCESS, EXIT_NO_MATCH, EXIT_USAGE, EXIT_IO, EXIT_CONFIG];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}

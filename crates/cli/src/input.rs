// Reading the text to analyze

use std::io::{self, Read};

use crate::CliError;

/// Text from the argument, or stdin when it is omitted.
///
/// One trailing line ending is dropped from stdin unless `keep_newline` is
/// set; `echo` adds one that was never typed.
pub fn read_text(arg: Option<String>, keep_newline: bool) -> Result<String, CliError> {
    if let Some(text) = arg {
        return Ok(text);
    }

    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .map_err(|e| CliError::io(format!("reading stdin: {}", e)))?;

    if !keep_newline {
        strip_line_ending(&mut buf);
    }
    Ok(buf)
}

fn strip_line_ending(buf: &mut String) {
    if buf.ends_with('\n') {
        buf.pop();
        if buf.ends_with('\r') {
            buf.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stripped(s: &str) -> String {
        let mut buf = s.to_string();
        strip_line_ending(&mut buf);
        buf
    }

    #[test]
    fn test_strip_single_line_ending() {
        assert_eq!(stripped("Hi @contact\n"), "Hi @contact");
        assert_eq!(stripped("Hi @contact\r\n"), "Hi @contact");
        assert_eq!(stripped("Hi @contact\n\n"), "Hi @contact\n");
        assert_eq!(stripped("Hi @contact "), "Hi @contact ");
        assert_eq!(stripped(""), "");
    }

    #[test]
    fn test_argument_is_used_verbatim() {
        let text = read_text(Some("Hi @contact\n".to_string()), false).unwrap();
        assert_eq!(text, "Hi @contact\n");
    }
}

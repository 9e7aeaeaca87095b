//! Line-based input source for interactive use.
//!
//! Validation happens here, at the boundary: the core only ever receives
//! well-typed values. Invalid answers are re-prompted until a valid one
//! arrives or input ends.

use std::io::{self, BufRead, Write};

use thiserror::Error;

use stockbill_core::{ItemId, Money};

#[derive(Debug, Error)]
pub enum InputError {
    #[error("input closed")]
    Closed,

    #[error("input/output failed: {0}")]
    Io(#[from] io::Error),
}

/// Supplies validated scalar values on demand.
pub trait InputSource {
    /// Show `prompt` and return the next raw line without its line ending.
    fn prompt_line(&mut self, prompt: &str) -> Result<String, InputError>;

    /// Tell the user an answer was rejected.
    fn reject(&mut self, message: &str) -> Result<(), InputError>;

    /// Re-prompt until `parse` accepts the trimmed answer.
    fn read_with<T>(
        &mut self,
        prompt: &str,
        mut parse: impl FnMut(&str) -> Result<T, String>,
    ) -> Result<T, InputError> {
        loop {
            let line = self.prompt_line(prompt)?;
            match parse(line.trim()) {
                Ok(value) => return Ok(value),
                Err(message) => self.reject(&message)?,
            }
        }
    }

    fn read_id(&mut self, prompt: &str) -> Result<ItemId, InputError> {
        self.read_with(prompt, |s| {
            s.parse::<ItemId>()
                .map_err(|_| "Invalid input. Enter a whole number.".to_string())
        })
    }

    /// A strictly positive count.
    fn read_quantity(&mut self, prompt: &str) -> Result<u32, InputError> {
        self.read_with(prompt, |s| match s.parse::<u32>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err("Invalid input. Enter a positive number.".to_string()),
        })
    }

    /// A count that may be zero (stock on hand).
    fn read_stock(&mut self, prompt: &str) -> Result<u32, InputError> {
        self.read_with(prompt, |s| {
            s.parse::<u32>()
                .map_err(|_| "Invalid input. Enter zero or a positive number.".to_string())
        })
    }

    fn read_price(&mut self, prompt: &str) -> Result<Money, InputError> {
        self.read_with(prompt, |s| {
            s.parse::<Money>()
                .map_err(|_| "Invalid price. Use a number with up to two decimals.".to_string())
        })
    }

    /// A single whitespace-free word.
    fn read_name(&mut self, prompt: &str) -> Result<String, InputError> {
        self.read_with(prompt, |s| {
            if s.is_empty() || s.chars().any(char::is_whitespace) {
                Err("Invalid name. Enter a single word.".to_string())
            } else {
                Ok(s.to_string())
            }
        })
    }

    /// `y`/`Y` is yes; anything else is no.
    fn confirm(&mut self, prompt: &str) -> Result<bool, InputError> {
        let line = self.prompt_line(prompt)?;
        Ok(matches!(line.trim(), "y" | "Y"))
    }
}

/// Reads answers from a buffered reader and writes prompts to a writer.
#[derive(Debug)]
pub struct LineInput<R, W> {
    reader: R,
    prompts: W,
}

impl<R: BufRead, W: Write> LineInput<R, W> {
    pub fn new(reader: R, prompts: W) -> Self {
        Self { reader, prompts }
    }

    pub fn into_parts(self) -> (R, W) {
        (self.reader, self.prompts)
    }
}

impl<R: BufRead, W: Write> InputSource for LineInput<R, W> {
    fn prompt_line(&mut self, prompt: &str) -> Result<String, InputError> {
        write!(self.prompts, "{prompt}")?;
        self.prompts.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(InputError::Closed);
        }
        let trimmed_len = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed_len);
        Ok(line)
    }

    fn reject(&mut self, message: &str) -> Result<(), InputError> {
        writeln!(self.prompts, "{message}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn input(script: &str) -> LineInput<Cursor<Vec<u8>>, Vec<u8>> {
        LineInput::new(Cursor::new(script.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn reprompts_until_quantity_is_positive() {
        let mut src = input("abc\n0\n-2\n5\n");
        assert_eq!(src.read_quantity("Qty: ").unwrap(), 5);

        let (_, prompts) = src.into_parts();
        let shown = String::from_utf8(prompts).unwrap();
        assert_eq!(shown.matches("Qty: ").count(), 4);
        assert_eq!(shown.matches("Enter a positive number").count(), 3);
    }

    #[test]
    fn names_must_be_single_words() {
        let mut src = input("Blue Pen\n\nBluePen\n");
        assert_eq!(src.read_name("Name: ").unwrap(), "BluePen");
    }

    #[test]
    fn prices_accept_legacy_forms() {
        let mut src = input("2.505\n2.5\n");
        assert_eq!(src.read_price("Price: ").unwrap(), Money::from_minor(250));
    }

    #[test]
    fn stock_may_be_zero() {
        let mut src = input("0\n");
        assert_eq!(src.read_stock("Stock: ").unwrap(), 0);
    }

    #[test]
    fn confirm_accepts_only_y() {
        let mut src = input("Y\nyes\nn\n");
        assert!(src.confirm("? ").unwrap());
        assert!(!src.confirm("? ").unwrap());
        assert!(!src.confirm("? ").unwrap());
    }

    #[test]
    fn end_of_input_is_closed() {
        let mut src = input("x\n");
        assert!(matches!(src.read_id("Id: "), Err(InputError::Closed)));
    }

    #[test]
    fn crlf_line_endings_are_stripped() {
        let mut src = input("12\r\n");
        assert_eq!(src.read_id("Id: ").unwrap(), ItemId::new(12));
    }
}

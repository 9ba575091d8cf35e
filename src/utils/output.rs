use std::fmt::Display;
use std::io::{self, BufRead, Write};

/// Output format configuration
#[derive(Clone, Debug)]
pub struct OutputFormat {
    pub raw: bool,
}

impl OutputFormat {
    pub fn new(raw: bool) -> Self {
        Self { raw }
    }

    /// Print tabular data - either raw (tab-separated) or formatted (column-aligned)
    pub fn print_table<T>(&self, headers: &[&str], data: &[Vec<T>])
    where
        T: Display + AsRef<str>,
    {
        print!("{}", self.render_table(headers, data));
    }

    /// Render a table. Raw output skips the header row so it can be piped.
    pub fn render_table<T>(&self, headers: &[&str], data: &[Vec<T>]) -> String
    where
        T: Display + AsRef<str>,
    {
        if data.is_empty() {
            return String::new();
        }

        if self.raw {
            let mut out = String::new();
            for row in data {
                let line = row
                    .iter()
                    .map(|cell| cell.as_ref())
                    .collect::<Vec<_>>()
                    .join("\t");
                out.push_str(&line);
                out.push('\n');
            }
            out
        } else {
            let mut rows: Vec<Vec<&str>> = Vec::with_capacity(data.len() + 1);
            rows.push(headers.to_vec());
            rows.extend(
                data.iter()
                    .map(|row| row.iter().map(|cell| cell.as_ref()).collect()),
            );
            Self::render_formatted(&rows)
        }
    }

    /// Print result lines, one per line
    pub fn print_list<T>(&self, items: &[T])
    where
        T: Display,
    {
        for item in items {
            println!("{item}");
        }
    }

    fn render_formatted(rows: &[Vec<&str>]) -> String {
        // Calculate column widths
        let num_cols = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        let mut col_widths = vec![0; num_cols];

        for row in rows {
            for (i, cell) in row.iter().enumerate() {
                col_widths[i] = col_widths[i].max(cell.chars().count());
            }
        }

        let mut out = String::new();
        for row in rows {
            let formatted_cells: Vec<String> = row
                .iter()
                .enumerate()
                .map(|(i, cell)| {
                    if i == row.len() - 1 {
                        // Last column - no padding needed
                        cell.to_string()
                    } else {
                        format!("{:<width$}", cell, width = col_widths[i])
                    }
                })
                .collect();

            out.push_str(&formatted_cells.join("  "));
            out.push('\n');
        }
        out
    }
}

/// Single-choice prompt used when a delete target is not given on the command line
pub trait Selector {
    /// Returns the chosen entry, or `None` when nothing was picked
    fn select(&mut self, message: &str, choices: &[String]) -> io::Result<Option<String>>;
}

/// Numbered menu on stderr, answer read from stdin
pub struct TerminalSelector {
    page_size: usize,
}

impl TerminalSelector {
    pub fn new(page_size: usize) -> Self {
        Self { page_size }
    }

    fn pick<R: BufRead, W: Write>(
        &self,
        input: &mut R,
        prompt: &mut W,
        message: &str,
        choices: &[String],
    ) -> io::Result<Option<String>> {
        if choices.is_empty() {
            writeln!(prompt, "Nothing to choose from")?;
            return Ok(None);
        }

        let mut offset = 0;
        loop {
            let page_end = (offset + self.page_size).min(choices.len());
            for (i, choice) in choices[offset..page_end].iter().enumerate() {
                writeln!(prompt, "{:>4}) {choice}", offset + i + 1)?;
            }
            if page_end < choices.len() {
                write!(prompt, "{message}[number, enter for more] ")?;
            } else {
                write!(prompt, "{message}")?;
            }
            prompt.flush()?;

            let mut answer = String::new();
            if input.read_line(&mut answer)? == 0 {
                return Ok(None);
            }
            let answer = answer.trim();

            if answer.is_empty() {
                if page_end < choices.len() {
                    offset = page_end;
                    continue;
                }
                return Ok(None);
            }

            match answer.parse::<usize>() {
                Ok(n) if (1..=choices.len()).contains(&n) => {
                    return Ok(Some(choices[n - 1].clone()));
                }
                _ => writeln!(prompt, "Invalid choice: {answer}")?,
            }
        }
    }
}

impl Selector for TerminalSelector {
    fn select(&mut self, message: &str, choices: &[String]) -> io::Result<Option<String>> {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut prompt = io::stderr();
        self.pick(&mut input, &mut prompt, message, choices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_output() {
        let format = OutputFormat::new(true);
        let data = vec![
            vec!["short", "medium", "very_long_column"],
            vec!["a", "bb", "ccc"],
        ];

        assert_eq!(
            format.render_table(&["A", "B", "C"], &data),
            "short\tmedium\tvery_long_column\na\tbb\tccc\n"
        );
    }

    #[test]
    fn test_formatted_output() {
        let format = OutputFormat::new(false);
        let data = vec![vec!["lb1", "443", "arn:one"], vec!["long-name", "8443", "arn:two"]];

        assert_eq!(
            format.render_table(&["Name", "Port", "Certificate"], &data),
            "Name       Port  Certificate\n\
             lb1        443   arn:one\n\
             long-name  8443  arn:two\n"
        );
    }

    #[test]
    fn test_empty_table_prints_nothing() {
        let format = OutputFormat::new(false);
        let data: Vec<Vec<String>> = Vec::new();
        assert_eq!(format.render_table(&["Name"], &data), "");
    }

    #[test]
    fn test_terminal_selector_picks_number() {
        let selector = TerminalSelector::new(20);
        let choices = vec!["first".to_string(), "second".to_string()];
        let mut input = "2\n".as_bytes();
        let mut prompt = Vec::new();

        let picked = selector
            .pick(&mut input, &mut prompt, "Choose: ", &choices)
            .unwrap();
        assert_eq!(picked.as_deref(), Some("second"));
        assert!(String::from_utf8(prompt).unwrap().contains("   1) first"));
    }

    #[test]
    fn test_terminal_selector_retries_and_pages() {
        let selector = TerminalSelector::new(1);
        let choices = vec!["first".to_string(), "second".to_string()];
        // enter shows the next page, 9 is out of range, then 2 is accepted
        let mut input = "\n9\n2\n".as_bytes();
        let mut prompt = Vec::new();

        let picked = selector
            .pick(&mut input, &mut prompt, "Choose: ", &choices)
            .unwrap();
        assert_eq!(picked.as_deref(), Some("second"));
        assert!(String::from_utf8(prompt).unwrap().contains("Invalid choice: 9"));
    }

    #[test]
    fn test_terminal_selector_eof_is_no_choice() {
        let selector = TerminalSelector::new(20);
        let choices = vec!["only".to_string()];
        let mut input = "".as_bytes();
        let mut prompt = Vec::new();

        assert_eq!(
            selector
                .pick(&mut input, &mut prompt, "Choose: ", &choices)
                .unwrap(),
            None
        );
    }
}

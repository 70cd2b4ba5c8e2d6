use std::io::{self, ErrorKind, Write, stdout};

/// Line-mode output for the non-interactive commands
pub struct TerminalRenderer;

impl TerminalRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn print_message(&self, message: &str) {
        println!("{}", message);
    }

    pub fn print_error(&self, message: &str) {
        eprintln!("Error: {}", message);
    }

    /// Aligned `key  value` rows on stdout
    pub fn print_table(&self, rows: &[(&str, String)]) -> io::Result<()> {
        write_table(&mut stdout().lock(), rows)
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// A closed reader (`playbar probe x | head -1`) ends the output quietly
fn write_table(out: &mut impl Write, rows: &[(&str, String)]) -> io::Result<()> {
    let width = rows.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    for (key, value) in rows {
        match writeln!(out, "{:width$}  {}", key, value, width = width) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::BrokenPipe => return Ok(()),
            Err(e) => return Err(e),
        }
    }
    out.flush().or_else(|e| if e.kind() == ErrorKind::BrokenPipe { Ok(()) } else { Err(e) })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Writer failing every write with `kind`, counting attempts
    struct FailingWriter {
        kind: ErrorKind,
        attempts: usize,
    }

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            self.attempts += 1;
            Err(io::Error::from(self.kind))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn rows() -> Vec<(&'static str, String)> {
        vec![("title", "clip.ogg".to_string()), ("duration", "03:10".to_string())]
    }

    #[test]
    fn rows_are_aligned() {
        let mut out = Vec::new();
        write_table(&mut out, &rows()).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "title     clip.ogg\nduration  03:10\n"
        );
    }

    #[test]
    fn broken_pipe_stops_quietly() {
        let mut out = FailingWriter {
            kind: ErrorKind::BrokenPipe,
            attempts: 0,
        };
        assert!(write_table(&mut out, &rows()).is_ok());
        assert_eq!(out.attempts, 1);
    }

    #[test]
    fn other_write_errors_propagate() {
        let mut out = FailingWriter {
            kind: ErrorKind::PermissionDenied,
            attempts: 0,
        };
        let err = write_table(&mut out, &rows()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
    }
}

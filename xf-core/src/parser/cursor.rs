//! Forward-only line cursor with a one-line pushback

/// Cursor over a materialized sequence of lines
///
/// Nested readers consume continuation lines and hand the first line that
/// does not belong to them back with [`LineCursor::push_back`], so the
/// outer loop sees it next.
#[derive(Debug)]
pub struct LineCursor<'a> {
    lines: Vec<&'a str>,
    pos: usize,
    can_push_back: bool,
}

impl<'a> LineCursor<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().collect(),
            pos: 0,
            can_push_back: false,
        }
    }

    /// Next line with its 1-based line number
    pub fn next_line(&mut self) -> Option<(usize, &'a str)> {
        let line = *self.lines.get(self.pos)?;
        self.pos += 1;
        self.can_push_back = true;
        Some((self.pos, line))
    }

    /// Un-consume the line last returned by `next_line`.
    ///
    /// Only one line can be pushed back; a second call is a no-op.
    pub fn push_back(&mut self) {
        if self.can_push_back {
            self.pos -= 1;
            self.can_push_back = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_back_replays_line() {
        let mut cursor = LineCursor::new("a\nb\nc");
        assert_eq!(cursor.next_line(), Some((1, "a")));
        assert_eq!(cursor.next_line(), Some((2, "b")));
        cursor.push_back();
        assert_eq!(cursor.next_line(), Some((2, "b")));
        assert_eq!(cursor.next_line(), Some((3, "c")));
        assert_eq!(cursor.next_line(), None);
    }

    #[test]
    fn test_only_one_line_of_pushback() {
        let mut cursor = LineCursor::new("a\nb");
        cursor.next_line();
        cursor.next_line();
        cursor.push_back();
        cursor.push_back();
        assert_eq!(cursor.next_line(), Some((2, "b")));
    }

    #[test]
    fn test_push_back_before_any_read_is_noop() {
        let mut cursor = LineCursor::new("a");
        cursor.push_back();
        assert_eq!(cursor.next_line(), Some((1, "a")));
    }

    #[test]
    fn test_crlf_lines() {
        let mut cursor = LineCursor::new("a\r\nb\r\n");
        assert_eq!(cursor.next_line(), Some((1, "a")));
        assert_eq!(cursor.next_line(), Some((2, "b")));
        assert_eq!(cursor.next_line(), None);
    }
}

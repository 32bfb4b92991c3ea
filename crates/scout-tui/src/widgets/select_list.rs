//! Selection cursor for scrollable song/session lists.
//!
//! Views render their own rows; this keeps selection and the visible
//! window consistent as list lengths change under the cursor (a re-fetch
//! can shrink a list while it is focused).

pub struct ListCursor {
    selected: usize,
    offset: usize,
}

impl ListCursor {
    pub fn new() -> Self {
        Self {
            selected: 0,
            offset: 0,
        }
    }

    pub fn selected(&self, len: usize) -> Option<usize> {
        if len == 0 {
            None
        } else {
            Some(self.selected.min(len - 1))
        }
    }

    pub fn up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn down(&mut self, len: usize) {
        if len > 0 && self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn first(&mut self) {
        self.selected = 0;
    }

    pub fn last(&mut self, len: usize) {
        self.selected = len.saturating_sub(1);
    }

    pub fn reset(&mut self) {
        self.selected = 0;
        self.offset = 0;
    }

    /// Visible row range for a viewport of `height` rows, keeping the
    /// selection in view.
    pub fn window(&mut self, len: usize, height: usize) -> std::ops::Range<usize> {
        if len == 0 || height == 0 {
            return 0..0;
        }
        let selected = self.selected.min(len - 1);
        if selected < self.offset {
            self.offset = selected;
        } else if selected >= self.offset + height {
            self.offset = selected + 1 - height;
        }
        if self.offset + height > len {
            self.offset = len.saturating_sub(height);
        }
        self.offset..(self.offset + height).min(len)
    }
}

impl Default for ListCursor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_clamps_to_shrunk_list() {
        let mut cursor = ListCursor::new();
        for _ in 0..9 {
            cursor.down(10);
        }
        assert_eq!(cursor.selected(10), Some(9));
        // List shrank under the cursor.
        assert_eq!(cursor.selected(4), Some(3));
        assert_eq!(cursor.selected(0), None);
    }

    #[test]
    fn test_window_follows_selection() {
        let mut cursor = ListCursor::new();
        assert_eq!(cursor.window(20, 5), 0..5);
        for _ in 0..7 {
            cursor.down(20);
        }
        let w = cursor.window(20, 5);
        assert!(w.contains(&7));
        cursor.first();
        assert_eq!(cursor.window(20, 5), 0..5);
    }
}

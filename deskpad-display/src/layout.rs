//! Slot layout for paged screens
//!
//! A list screen (playlists, audio outputs, ...) usually keeps one column of
//! the grid for navigation keys and fills the remaining slots with content.
//! `SlotLayout` maps between content positions on a page and physical slots,
//! and computes the next page offset, wrapping to the start after a short
//! page.
//!
//! Reference 5x3 layout with the last column reserved:
//!
//! ```text
//!  0  1  2  3 | 4
//!  5  6  7  8 | 9
//! 10 11 12 13 | 14
//! ```
//!
//! Content positions 0..12 land on slots 0-3, 5-8 and 10-13.

use deskpad_protocol::DeviceModel;

/// Grid geometry with an optional navigation column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SlotLayout {
    columns: u8,
    rows: u8,
    reserved_column: Option<u8>,
}

impl SlotLayout {
    /// Layout using every slot of a `columns` x `rows` grid for content
    pub const fn new(columns: u8, rows: u8) -> Self {
        Self {
            columns,
            rows,
            reserved_column: None,
        }
    }

    /// Layout matching `model`'s key grid
    pub const fn for_model(model: DeviceModel) -> Self {
        Self::new(model.columns() as u8, model.rows() as u8)
    }

    /// Keep `column` free of content
    ///
    /// Columns outside the grid are ignored.
    pub const fn with_reserved_column(mut self, column: u8) -> Self {
        if column < self.columns {
            self.reserved_column = Some(column);
        }
        self
    }

    /// Reserved column, if any
    pub fn reserved_column(&self) -> Option<u8> {
        self.reserved_column
    }

    /// Slots in the whole grid
    pub fn key_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Content columns per row
    fn content_columns(&self) -> usize {
        self.columns as usize - usize::from(self.reserved_column.is_some())
    }

    /// Content items shown per page
    pub fn page_size(&self) -> usize {
        self.content_columns() * self.rows as usize
    }

    /// Physical slot of content position `index` on a page
    pub fn content_to_slot(&self, index: usize) -> Option<u8> {
        if index >= self.page_size() {
            return None;
        }
        let row = index / self.content_columns();
        let mut column = index % self.content_columns();
        if let Some(reserved) = self.reserved_column {
            if column >= reserved as usize {
                column += 1;
            }
        }
        u8::try_from(row * self.columns as usize + column).ok()
    }

    /// Content position of `slot`, `None` for navigation slots
    pub fn slot_to_content(&self, slot: u8) -> Option<usize> {
        let slot = slot as usize;
        if slot >= self.key_count() {
            return None;
        }
        let row = slot / self.columns as usize;
        let mut column = slot % self.columns as usize;
        if let Some(reserved) = self.reserved_column {
            let reserved = reserved as usize;
            if column == reserved {
                return None;
            }
            if column > reserved {
                column -= 1;
            }
        }
        Some(row * self.content_columns() + column)
    }

    /// Slots that show content, in content order
    pub fn content_slots(&self) -> impl Iterator<Item = u8> + '_ {
        (0..self.page_size()).filter_map(|index| self.content_to_slot(index))
    }

    /// Offset of the page after the one starting at `offset`
    ///
    /// `shown` is how many items the current page held. A short page means
    /// the end of the list was reached, so the next page starts over.
    pub fn next_offset(&self, offset: usize, shown: usize) -> usize {
        if shown < self.page_size() {
            0
        } else {
            offset + self.page_size()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn reference() -> SlotLayout {
        SlotLayout::for_model(DeviceModel::OriginalV2).with_reserved_column(4)
    }

    #[test]
    fn test_reference_mapping() {
        let layout = reference();
        assert_eq!(layout.key_count(), 15);
        assert_eq!(layout.page_size(), 12);

        let slots: std::vec::Vec<u8> = layout.content_slots().collect();
        assert_eq!(slots, [0, 1, 2, 3, 5, 6, 7, 8, 10, 11, 12, 13]);
        assert_eq!(layout.content_to_slot(12), None);
    }

    #[test]
    fn test_navigation_slots_have_no_content() {
        let layout = reference();
        for slot in [4, 9, 14] {
            assert_eq!(layout.slot_to_content(slot), None);
        }
        assert_eq!(layout.slot_to_content(5), Some(4));
        assert_eq!(layout.slot_to_content(13), Some(11));
        assert_eq!(layout.slot_to_content(15), None);
    }

    #[test]
    fn test_without_reserved_column() {
        let layout = SlotLayout::new(3, 2);
        assert_eq!(layout.page_size(), 6);
        assert_eq!(layout.content_to_slot(4), Some(4));
        assert_eq!(layout.slot_to_content(5), Some(5));
    }

    #[test]
    fn test_reserved_column_outside_grid_is_ignored() {
        let layout = SlotLayout::new(3, 2).with_reserved_column(3);
        assert_eq!(layout.reserved_column(), None);
        assert_eq!(layout.page_size(), 6);
    }

    #[test]
    fn test_paging_wraps_after_short_page() {
        let layout = reference();
        assert_eq!(layout.next_offset(0, 12), 12);
        assert_eq!(layout.next_offset(12, 12), 24);
        assert_eq!(layout.next_offset(24, 5), 0);
        assert_eq!(layout.next_offset(0, 0), 0);
    }

    proptest! {
        #[test]
        fn prop_mapping_is_inverse(columns in 2u8..9, rows in 1u8..5, reserved in 0u8..9) {
            let layout = SlotLayout::new(columns, rows).with_reserved_column(reserved);
            for index in 0..layout.page_size() {
                let slot = layout.content_to_slot(index).unwrap();
                prop_assert!((slot as usize) < layout.key_count());
                prop_assert_eq!(layout.slot_to_content(slot), Some(index));
            }
            let navigation = (0..layout.key_count() as u8)
                .filter(|slot| layout.slot_to_content(*slot).is_none())
                .count();
            prop_assert_eq!(navigation, layout.key_count() - layout.page_size());
        }
    }
}

/// Loading flags supplied by whoever owns the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadFlags {
    pub loading: bool,
    pub has_more: bool,
    pub is_loading_more: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceholderRows {
    pub skeleton_rows: usize,
    pub loading_more_rows: usize,
}

impl Default for PlaceholderRows {
    fn default() -> Self {
        Self {
            skeleton_rows: 8,
            loading_more_rows: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    NoData,
    NoMoreItems,
}

impl Message {
    pub fn text(self) -> &'static str {
        match self {
            Message::NoData => "No data",
            Message::NoMoreItems => "No more items",
        }
    }
}

/// One line of the table body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyRow {
    Data(usize),
    Skeleton,
    Message { message: Message, span: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    pub body: Vec<BodyRow>,
    /// The next-page sentinel follows the last data row.
    pub sentinel: bool,
}

/// Whether the next-page sentinel follows the rows: data is shown, nothing
/// is loading and the source has more pages.
pub fn has_sentinel(flags: LoadFlags, row_count: usize) -> bool {
    !flags.loading && row_count > 0 && !flags.is_loading_more && flags.has_more
}

pub fn resolve(
    flags: LoadFlags,
    row_count: usize,
    span: usize,
    placeholders: PlaceholderRows,
) -> Presentation {
    if flags.loading {
        return Presentation {
            body: vec![BodyRow::Skeleton; placeholders.skeleton_rows],
            sentinel: false,
        };
    }
    if row_count == 0 {
        return Presentation {
            body: vec![BodyRow::Message {
                message: Message::NoData,
                span,
            }],
            sentinel: false,
        };
    }

    let mut body: Vec<BodyRow> = (0..row_count).map(BodyRow::Data).collect();
    if flags.is_loading_more {
        body.extend(std::iter::repeat_n(
            BodyRow::Skeleton,
            placeholders.loading_more_rows,
        ));
    } else if !flags.has_more {
        body.push(BodyRow::Message {
            message: Message::NoMoreItems,
            span,
        });
    }
    Presentation {
        body,
        sentinel: has_sentinel(flags, row_count),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(loading: bool, has_more: bool, is_loading_more: bool) -> LoadFlags {
        LoadFlags {
            loading,
            has_more,
            is_loading_more,
        }
    }

    fn messages(p: &Presentation) -> Vec<Message> {
        p.body
            .iter()
            .filter_map(|r| match r {
                BodyRow::Message { message, .. } => Some(*message),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn loading_shows_only_skeletons() {
        let p = resolve(flags(true, true, false), 0, 4, PlaceholderRows::default());
        assert_eq!(p.body, vec![BodyRow::Skeleton; 8]);
        assert!(messages(&p).is_empty());
        assert!(!p.sentinel);

        let p = resolve(flags(true, false, true), 30, 4, PlaceholderRows::default());
        assert_eq!(p.body.len(), 8);
    }

    #[test]
    fn empty_data_is_a_single_no_data_row() {
        for (has_more, more) in [(true, true), (true, false), (false, true), (false, false)] {
            let p = resolve(flags(false, has_more, more), 0, 5, PlaceholderRows::default());
            assert_eq!(
                p.body,
                vec![BodyRow::Message {
                    message: Message::NoData,
                    span: 5
                }]
            );
        }
    }

    #[test]
    fn loading_more_appends_skeletons() {
        let p = resolve(flags(false, true, true), 2, 3, PlaceholderRows::default());
        assert_eq!(
            p.body,
            vec![
                BodyRow::Data(0),
                BodyRow::Data(1),
                BodyRow::Skeleton,
                BodyRow::Skeleton,
                BodyRow::Skeleton
            ]
        );
        assert!(!p.sentinel);
    }

    #[test]
    fn exhausted_data_ends_with_no_more_items() {
        let p = resolve(flags(false, false, false), 2, 3, PlaceholderRows::default());
        assert_eq!(
            p.body.last(),
            Some(&BodyRow::Message {
                message: Message::NoMoreItems,
                span: 3
            })
        );
        assert_eq!(p.body.len(), 3);
    }

    #[test]
    fn more_pages_leave_only_rows_and_the_sentinel() {
        let p = resolve(flags(false, true, false), 2, 3, PlaceholderRows::default());
        assert_eq!(p.body, vec![BodyRow::Data(0), BodyRow::Data(1)]);
        assert!(p.sentinel);
    }

    #[test]
    fn placeholder_counts_are_configurable() {
        let rows = PlaceholderRows {
            skeleton_rows: 2,
            loading_more_rows: 1,
        };
        assert_eq!(resolve(flags(true, true, false), 0, 1, rows).body.len(), 2);
        assert_eq!(resolve(flags(false, true, true), 4, 1, rows).body.len(), 5);
    }
}

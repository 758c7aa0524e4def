//! Declarative field rules: each field names an ordered list of lookups and
//! the first one that finds a value wins.

use crate::document::Document;

/// A single way of finding a value in a fragment of markup.
pub(crate) type Lookup<T> = fn(&Document<'_>) -> Option<T>;

pub(crate) struct FieldRule<T: 'static> {
    pub(crate) field: &'static str,
    pub(crate) lookups: &'static [Lookup<T>],
}

impl<T> FieldRule<T> {
    /// Run the lookups in order and return the first value found.
    ///
    /// A miss is not an error: the field is simply absent and the caller
    /// decides the default.
    pub(crate) fn resolve(&self, doc: &Document<'_>) -> Option<T> {
        let found = self
            .lookups
            .iter()
            .enumerate()
            .find_map(|(index, lookup)| lookup(doc).map(|value| (index, value)));

        match found {
            Some((index, value)) => {
                tracing::trace!(field = self.field, rule = index, "field extracted");
                Some(value)
            }
            None => {
                tracing::debug!(field = self.field, "no extraction rule matched");
                None
            }
        }
    }

    pub(crate) fn resolve_or(&self, doc: &Document<'_>, default: impl FnOnce() -> T) -> T {
        self.resolve(doc).unwrap_or_else(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn never(_: &Document<'_>) -> Option<u32> {
        None
    }

    fn length(doc: &Document<'_>) -> Option<u32> {
        u32::try_from(doc.html().len()).ok()
    }

    fn seven(_: &Document<'_>) -> Option<u32> {
        Some(7)
    }

    #[test]
    fn first_matching_lookup_wins() {
        const LOOKUPS: &[Lookup<u32>] = &[never, length, seven];
        let rule = FieldRule {
            field: "n",
            lookups: LOOKUPS,
        };
        assert_eq!(rule.resolve(&Document::new("abc")), Some(3));
    }

    #[test]
    fn miss_falls_back_to_default() {
        const LOOKUPS: &[Lookup<u32>] = &[never];
        let rule = FieldRule {
            field: "n",
            lookups: LOOKUPS,
        };
        let doc = Document::new("abc");
        assert_eq!(rule.resolve(&doc), None);
        assert_eq!(rule.resolve_or(&doc, || 0), 0);
    }
}

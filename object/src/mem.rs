//! The in-memory DICOM data set.
//!
//! Elements are kept in a map ordered by tag,
//! which matches the encoded order of a conformant data set.
//! Each data set carries the specific character set
//! which was active at its nesting level when it was read,
//! so that its text values can be re-encoded on write.

use dcmflow_core::header::{DataElement, Header, Tag, VR};
use dcmflow_core::value::PrimitiveValue;
use dcmflow_encoding::text::SpecificCharacterSet;
use std::collections::btree_map::Values;
use std::collections::BTreeMap;

/// A data element whose sequence items are in-memory data sets.
pub type InMemElement = DataElement<InMemDicomObject>;

/// An in-memory DICOM data set:
/// an ordered collection of data elements indexed by tag.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InMemDicomObject {
    entries: BTreeMap<Tag, InMemElement>,
    charset: SpecificCharacterSet,
}

impl InMemDicomObject {
    /// Create a new empty data set with the default character set.
    pub fn new_empty() -> InMemDicomObject {
        InMemDicomObject::default()
    }

    /// Create a new empty data set with the given character set.
    pub fn with_charset(charset: SpecificCharacterSet) -> InMemDicomObject {
        InMemDicomObject {
            entries: BTreeMap::new(),
            charset,
        }
    }

    /// The character set active for this data set's text values.
    pub fn charset(&self) -> SpecificCharacterSet {
        self.charset
    }

    /// Replace the active character set.
    pub fn set_charset(&mut self, charset: SpecificCharacterSet) {
        self.charset = charset;
    }

    /// Retrieve the element with the given tag, if present.
    pub fn element(&self, tag: Tag) -> Option<&InMemElement> {
        self.entries.get(&tag)
    }

    /// Insert a data element into the data set,
    /// replacing (and returning) any previous element of the same tag.
    pub fn put(&mut self, elem: InMemElement) -> Option<InMemElement> {
        self.entries.insert(elem.tag(), elem)
    }

    /// Insert an element with a primitive string value.
    pub fn put_str(&mut self, tag: Tag, vr: VR, value: &str) -> Option<InMemElement> {
        self.put(DataElement::new(tag, vr, PrimitiveValue::from(value)))
    }

    /// Remove the element with the given tag, returning it if present.
    pub fn take(&mut self, tag: Tag) -> Option<InMemElement> {
        self.entries.remove(&tag)
    }

    /// The number of top-level elements in the data set.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the data set has no elements.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the elements in tag order.
    pub fn iter(&self) -> Values<'_, Tag, InMemElement> {
        self.entries.values()
    }

    /// Retrieve the element at the end of the given tag path.
    ///
    /// Every non-terminal tag must refer to a sequence element,
    /// of which only the *first* item is descended.
    /// Returns `None` if any component along the path is missing,
    /// is not a sequence, or has no items.
    pub fn element_at_path(&self, path: &[Tag]) -> Option<&InMemElement> {
        let (&last, init) = path.split_last()?;
        let mut ds = self;
        for &tag in init {
            let elem = ds.element(tag)?;
            if elem.vr() != VR::SQ {
                return None;
            }
            ds = elem.value().items()?.first()?;
        }
        ds.element(last)
    }

    /// Find the first element with the given tag
    /// among all item data sets of the sequence element `seq_tag`,
    /// scanning items in order.
    ///
    /// This is the look-up used for patient level attributes
    /// of a DICOMDIR's directory record sequence.
    pub fn find_in_sequence(&self, seq_tag: Tag, tag: Tag) -> Option<&InMemElement> {
        let seq = self.element(seq_tag)?;
        if seq.vr() != VR::SQ {
            return None;
        }
        seq.value()
            .items()?
            .iter()
            .find_map(|item| item.element(tag))
    }
}

impl<'a> IntoIterator for &'a InMemDicomObject {
    type Item = &'a InMemElement;
    type IntoIter = Values<'a, Tag, InMemElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcmflow_core::value::Value;
    use dcmflow_core::C;
    use smallvec::smallvec;

    fn sample_sequence(items: C<InMemDicomObject>) -> Value<InMemDicomObject> {
        let len = dcmflow_core::Length::UNDEFINED;
        Value::Sequence { items, len }
    }

    #[test]
    fn put_and_get() {
        let mut obj = InMemDicomObject::new_empty();
        obj.put_str(Tag(0x0010, 0x0020), VR::LO, "ID0001");
        let e = obj.element(Tag(0x0010, 0x0020)).unwrap();
        assert_eq!(e.vr(), VR::LO);
        assert_eq!(
            e.value().primitive().unwrap().to_str().unwrap(),
            "ID0001"
        );
        assert_eq!(obj.element(Tag(0x0010, 0x0010)), None);
    }

    #[test]
    fn path_walk() {
        let mut first = InMemDicomObject::new_empty();
        first.put_str(Tag(0x0010, 0x0020), VR::LO, "A");
        let mut second = InMemDicomObject::new_empty();
        second.put_str(Tag(0x0010, 0x0020), VR::LO, "B");

        let mut obj = InMemDicomObject::new_empty();
        obj.put(DataElement::new(
            Tag(0x0004, 0x1220),
            VR::SQ,
            sample_sequence(smallvec![first, second]),
        ));

        // only the first item is considered
        let e = obj
            .element_at_path(&[Tag(0x0004, 0x1220), Tag(0x0010, 0x0020)])
            .unwrap();
        assert_eq!(e.value().primitive().unwrap().to_str().unwrap(), "A");

        // a non-sequence intermediate yields nothing
        obj.put_str(Tag(0x0008, 0x0060), VR::CS, "CT");
        assert_eq!(
            obj.element_at_path(&[Tag(0x0008, 0x0060), Tag(0x0010, 0x0020)]),
            None
        );
    }

    #[test]
    fn sequence_wide_search() {
        let first = InMemDicomObject::new_empty();
        let mut second = InMemDicomObject::new_empty();
        second.put_str(Tag(0x0010, 0x0010), VR::PN, "DOE^JOHN");

        let mut obj = InMemDicomObject::new_empty();
        obj.put(DataElement::new(
            Tag(0x0004, 0x1220),
            VR::SQ,
            sample_sequence(smallvec![first, second]),
        ));

        // first item has no PatientName, so the second one matches
        let e = obj
            .find_in_sequence(Tag(0x0004, 0x1220), Tag(0x0010, 0x0010))
            .unwrap();
        assert_eq!(
            e.value().primitive().unwrap().to_str().unwrap(),
            "DOE^JOHN"
        );
    }
}

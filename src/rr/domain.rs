// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! domain name, aka labels, implementation

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::{DnsError, DnsErrorKind, DnsResult};
use crate::serialize::binary::{BinDecodable, BinDecoder, BinEncodable, BinEncoder};

/// A domain name: an ordered sequence of labels.
///
/// Labels are stored byte-for-byte as they appeared on the wire or in the
/// source string; comparisons are ASCII case-insensitive per convention. Each
/// label is limited to 63 octets and the whole name to 255 encoded octets,
/// including the length prefixes and the terminating zero.
#[derive(Clone, Debug, Default)]
pub struct Name {
    is_fqdn: bool,
    labels: Vec<Box<[u8]>>,
}

impl Name {
    /// Create a new domain::Name, i.e. label
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the root label, i.e. no labels.
    pub fn root() -> Self {
        let mut this = Self::new();
        this.is_fqdn = true;
        this
    }

    /// Returns true if there are no labels, i.e. it's empty.
    ///
    /// In DNS the root is represented by `.`
    pub fn is_root(&self) -> bool {
        self.labels.is_empty() && self.is_fqdn()
    }

    /// Returns true if the name is a fully qualified domain name.
    ///
    /// If this is true, it has effects like only querying for this single
    ///  name, as opposed to building up a search list in a resolver.
    pub fn is_fqdn(&self) -> bool {
        self.is_fqdn
    }

    /// Specifies this name is a fully qualified domain name
    pub fn set_fqdn(&mut self, val: bool) {
        self.is_fqdn = val;
    }

    /// Creates a new Name from the sequence of labels
    ///
    /// # Errors
    ///
    /// Fails if any label exceeds 63 octets or the name as a whole exceeds
    ///  the 255 octet limit.
    pub fn from_labels<I, L>(labels: I) -> DnsResult<Self>
    where
        I: IntoIterator<Item = L>,
        L: AsRef<[u8]>,
    {
        let mut name = Self::new();
        for label in labels {
            let label = label.as_ref();
            if label.is_empty() {
                return Err("label cannot be empty".into());
            }
            if label.len() > 63 {
                return Err(DnsErrorKind::LabelBytesTooLong(label.len()).into());
            }
            name.labels.push(label.into());
        }

        let len = name.len();
        if len >= 255 {
            return Err(DnsErrorKind::DomainNameTooLong(len).into());
        }

        name.is_fqdn = true;
        Ok(name)
    }

    /// Returns the number of labels in the name.
    pub fn num_labels(&self) -> u8 {
        self.labels.len() as u8
    }

    /// Returns the length in bytes of the labels. '.' counts as 1
    ///
    /// This is the label bytes plus one separator per label, which matches the
    ///  encoded length of the name: each length prefix stands in for a dot and
    ///  the terminating zero for the final dot of the FQDN.
    pub fn len(&self) -> usize {
        let dots = if !self.labels.is_empty() {
            self.labels.len()
        } else {
            1
        };
        self.labels.iter().fold(dots, |acc, item| acc + item.len())
    }

    /// Returns true if the name has no labels
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterator over the raw label bytes, left to right
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.labels.iter().map(AsRef::as_ref)
    }

    /// attempts to parse a name such as `"example.com."` or `"subdomain.example.com"`
    ///
    /// A trailing dot marks the name as fully qualified. Escapes are not
    ///  interpreted; bytes are taken as they appear.
    pub fn parse(local: &str) -> DnsResult<Self> {
        // short circuit root parse
        if local == "." {
            return Ok(Self::root());
        }

        let (stripped, is_fqdn) = match local.strip_suffix('.') {
            Some(stripped) => (stripped, true),
            None => (local, false),
        };

        let mut name = Self::from_labels(stripped.split('.'))?;
        name.is_fqdn = is_fqdn;
        Ok(name)
    }

    fn cmp_labels(&self, other: &Self) -> Ordering {
        if self.labels.is_empty() && other.labels.is_empty() {
            return Ordering::Equal;
        }

        // compare from the root toward the leftmost label
        let self_labels = self.labels.iter().rev();
        let other_labels = other.labels.iter().rev();

        for (l, r) in self_labels.zip(other_labels) {
            match l
                .iter()
                .map(u8::to_ascii_lowercase)
                .cmp(r.iter().map(u8::to_ascii_lowercase))
            {
                Ordering::Equal => continue,
                not_eq => return not_eq,
            }
        }

        self.labels.len().cmp(&other.labels.len())
    }
}

impl BinEncodable for Name {
    /// Writes the labels with their length prefixes and the terminating zero.
    ///
    /// Compression is not performed; a query carries a single name, so there
    ///  is no earlier occurrence to share a suffix with.
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> DnsResult<()> {
        let buf_len = encoder.len(); // lazily assert the size is less than 256...

        for label in &self.labels {
            if label.len() > 63 {
                return Err(DnsErrorKind::LabelBytesTooLong(label.len()).into());
            }
            encoder.emit_character_data(label)?;
        }

        // the end of the list of labels
        encoder.emit(0)?;

        // the entire name needs to be less than 256.
        let length = encoder.len() - buf_len;
        if length > 255 {
            return Err(DnsErrorKind::DomainNameTooLong(length).into());
        }

        Ok(())
    }
}

impl BinDecodable for Name {
    /// parses the chain of labels
    ///  this has a max of 255 octets, with each label being less than 63.
    ///
    /// Every suffix encountered is recorded in the decoder's pointer cache
    ///  under its starting offset. A compression pointer therefore resolves
    ///  with a single lookup; pointers must target a strictly earlier offset
    ///  at which a name was already decoded, so chains cannot loop.
    fn read(decoder: &mut BinDecoder<'_>) -> DnsResult<Self> {
        let name_start = decoder.index();

        // the labels walked before the name terminated, with their offsets
        let mut labels: Vec<(usize, Box<[u8]>)> = Vec::with_capacity(3);
        let mut via_pointer = false;

        // reserved: (1000 0000 aka 0x80) and (0100 0000 aka 0x40)
        // pointer: (byte & 0xC0 == 0xC0), then ((byte & 0x3F) << 8) | next = offset
        // label: byte == length, 1..=63; the following `length` bytes are the label
        // root: 0000
        let tail: Self = loop {
            let offset = decoder.index();
            match decoder.peek() {
                None => {
                    // Valid names on the wire end in a zero octet or a pointer;
                    // running out of input before either is a malformed name.
                    return Err("unexpected end of input reached".into());
                }
                Some(0) => {
                    decoder.pop()?;
                    break Self::root();
                }
                Some(byte) if byte & 0b1100_0000 == 0b1100_0000 => {
                    let ptr = decoder.read_u16()? & 0x3FFF;

                    // all pointer targets must appear prior to this name
                    if ptr as usize >= name_start {
                        return Err(DnsErrorKind::PointerNotPriorToLabel { idx: offset, ptr }.into());
                    }

                    via_pointer = true;
                    match decoder.name_at(ptr) {
                        Some(name) => break name,
                        None => return Err(DnsErrorKind::UnknownLabelPointer(ptr).into()),
                    }
                }
                Some(byte) if byte & 0b1100_0000 == 0b0000_0000 => {
                    // the mask bounds the length to 63
                    let label = decoder.read_character_data()?;
                    labels.push((offset, label.into()));
                }
                Some(byte) => return Err(DnsErrorKind::UnrecognizedLabelCode(byte).into()),
            }
        };

        let mut name = tail;

        if labels.is_empty() && via_pointer {
            // a name which is nothing but a pointer: later references to this
            // position resolve directly to the target suffix
            decoder.store_name(name_start, &name);
        }

        // build the name right-to-left, recording every suffix on the way
        for (offset, label) in labels.into_iter().rev() {
            name.labels.insert(0, label);
            decoder.store_name(offset, &name);
        }

        let len = name.len();
        if len >= 255 {
            return Err(DnsErrorKind::DomainNameTooLong(len).into());
        }

        Ok(name)
    }
}

impl fmt::Display for Name {
    /// Prints the labels joined by dots, with dots, backslashes and
    ///  non-graphic bytes escaped in `\ddd` form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut iter = self.labels.iter();
        if let Some(label) = iter.next() {
            write_label(f, label)?;
        }

        for label in iter {
            write!(f, ".")?;
            write_label(f, label)?;
        }

        // if it was the root name
        if self.is_root() || self.is_fqdn() {
            write!(f, ".")?;
        }
        Ok(())
    }
}

fn write_label(f: &mut fmt::Formatter<'_>, label: &[u8]) -> fmt::Result {
    for byte in label {
        match byte {
            b'.' | b'\\' => write!(f, "\\{}", *byte as char)?,
            b if b.is_ascii_graphic() || *b == b' ' => write!(f, "{}", *b as char)?,
            b => write!(f, "\\{:03}", b)?,
        }
    }
    Ok(())
}

impl FromStr for Name {
    type Err = DnsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl PartialEq<Self> for Name {
    fn eq(&self, other: &Self) -> bool {
        self.cmp_labels(other) == Ordering::Equal
    }
}

impl Eq for Name {}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for label in &self.labels {
            for byte in label.iter() {
                state.write_u8(byte.to_ascii_lowercase());
            }
            state.write_u8(b'.');
        }
    }
}

impl PartialOrd<Self> for Name {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Name {
    /// Case insensitive comparison, ordered from the rightmost label.
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_labels(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DnsErrorKind;

    fn get_data() -> Vec<(Name, Vec<u8>)> {
        vec![
            (Name::root(), vec![0]), // base case, only the root
            (
                Name::from_labels(["a"]).unwrap(),
                vec![1, b'a', 0],
            ), // a single 'a' label
            (
                Name::from_labels(["a", "bc"]).unwrap(),
                vec![1, b'a', 2, b'b', b'c', 0],
            ), // two labels, 'a.bc'
            (
                Name::from_labels(["a", "♥"]).unwrap(),
                vec![1, b'a', 3, 0xE2, 0x99, 0xA5, 0],
            ), // two labels utf8, 'a.♥'
        ]
    }

    #[test]
    fn test_read() {
        for (expect, binary) in get_data() {
            let mut decoder = BinDecoder::new(&binary);
            let got = Name::read(&mut decoder).unwrap();
            assert_eq!(got, expect);
        }
    }

    #[test]
    fn test_write_to() {
        for (name, expect) in get_data() {
            let mut bytes: Vec<u8> = Vec::new();
            {
                let mut encoder = BinEncoder::new(&mut bytes);
                name.emit(&mut encoder).unwrap();
            }
            assert_eq!(bytes, expect);
        }
    }

    #[test]
    fn test_num_labels() {
        assert_eq!(Name::from_labels(["a"]).unwrap().num_labels(), 1);
        assert_eq!(Name::from_labels(["a", "b"]).unwrap().num_labels(), 2);
        assert_eq!(Name::root().num_labels(), 0);
    }

    #[test]
    fn test_pointer() {
        // ra.rb.rc at offset 0, then z.ra.rb.rc expressed with a pointer to 0,
        // then rc expressed with a pointer to the "rc" suffix at offset 6
        let bytes: Vec<u8> = vec![
            2, b'r', b'a', 2, b'r', b'b', 2, b'r', b'c', 0, // ra.rb.rc
            1, b'z', 0xC0, 0x00, // z.ra.rb.rc
            0xC0, 0x06, // rc
        ];

        let mut d = BinDecoder::new(&bytes);

        let first = Name::read(&mut d).unwrap();
        assert_eq!(first, Name::from_labels(["ra", "rb", "rc"]).unwrap());

        let second = Name::read(&mut d).unwrap();
        assert_eq!(second, Name::from_labels(["z", "ra", "rb", "rc"]).unwrap());

        let third = Name::read(&mut d).unwrap();
        assert_eq!(third, Name::from_labels(["rc"]).unwrap());

        assert_eq!(d.pointer_cache_hits(), 2);
    }

    #[test]
    fn test_pointer_chain() {
        // a bare-pointer name is itself recorded, so a pointer to it resolves
        let bytes: Vec<u8> = vec![
            2, b'r', b'a', 0, // ra
            0xC0, 0x00, // pointer to ra
            0xC0, 0x04, // pointer to the previous pointer
        ];

        let mut d = BinDecoder::new(&bytes);

        assert_eq!(Name::read(&mut d).unwrap(), Name::from_labels(["ra"]).unwrap());
        assert_eq!(Name::read(&mut d).unwrap(), Name::from_labels(["ra"]).unwrap());
        assert_eq!(Name::read(&mut d).unwrap(), Name::from_labels(["ra"]).unwrap());
    }

    #[test]
    fn test_forward_pointer_rejected() {
        // pointer at the very start of the message can only point forward
        let bytes: Vec<u8> = vec![0xC0, 0x02, 1, b'a', 0];
        let mut d = BinDecoder::new(&bytes);

        let err = Name::read(&mut d).unwrap_err();
        assert!(matches!(
            err.kind(),
            DnsErrorKind::PointerNotPriorToLabel { .. }
        ));
    }

    #[test]
    fn test_pointer_to_unparsed_offset_rejected() {
        // offset 1 is the middle of the 'ab' label, no name was decoded there
        let bytes: Vec<u8> = vec![2, b'a', b'b', 0, 0xC0, 0x01];
        let mut d = BinDecoder::new(&bytes);

        Name::read(&mut d).unwrap();
        let err = Name::read(&mut d).unwrap_err();
        assert!(matches!(err.kind(), DnsErrorKind::UnknownLabelPointer(1)));
    }

    #[test]
    fn test_reserved_label_code_rejected() {
        let bytes: Vec<u8> = vec![0x80, b'a', 0];
        let mut d = BinDecoder::new(&bytes);

        let err = Name::read(&mut d).unwrap_err();
        assert!(matches!(
            err.kind(),
            DnsErrorKind::UnrecognizedLabelCode(0x80)
        ));
    }

    #[test]
    fn test_truncated_name_rejected() {
        let bytes: Vec<u8> = vec![3, b'a', b'b'];
        let mut d = BinDecoder::new(&bytes);
        assert!(Name::read(&mut d).is_err());

        // missing the terminating zero
        let bytes: Vec<u8> = vec![1, b'a'];
        let mut d = BinDecoder::new(&bytes);
        assert!(Name::read(&mut d).is_err());
    }

    #[test]
    fn test_oversized_name_rejected() {
        // four 63-octet labels encode to 257 octets, over the 255 limit
        let mut bytes: Vec<u8> = Vec::new();
        for _ in 0..4 {
            bytes.push(63);
            bytes.extend(std::iter::repeat(b'x').take(63));
        }
        bytes.push(0);

        let mut d = BinDecoder::new(&bytes);
        let err = Name::read(&mut d).unwrap_err();
        assert!(matches!(err.kind(), DnsErrorKind::DomainNameTooLong(..)));
    }

    #[test]
    fn test_parse_and_display() {
        let name = Name::parse("www.example.com.").unwrap();
        assert!(name.is_fqdn());
        assert_eq!(name.to_string(), "www.example.com.");

        let name = Name::parse("www.example.com").unwrap();
        assert!(!name.is_fqdn());
        assert_eq!(name.to_string(), "www.example.com");

        assert_eq!(Name::parse(".").unwrap(), Name::root());
        assert!(Name::parse("a..b").is_err());
        assert!(Name::parse(&format!("{}.com", "x".repeat(64))).is_err());
    }

    #[test]
    fn test_case_insensitive_eq() {
        assert_eq!(
            Name::parse("WWW.example.COM").unwrap(),
            Name::parse("www.EXAMPLE.com.").unwrap()
        );
    }
}

//! Bulk loading of a tree from a stream of fixed-width binary integers
//!
//! Each record is one 4-byte signed integer. Records are inserted in stream order. A
//! trailing partial record is ignored and reported in the [`LoadSummary`].

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use log::{debug, info, warn};
use rustc_hash::FxHashSet;

use crate::{Error, RandomizedTree, Randomness, Result};

const RECORD_LEN: usize = 4;
const PROGRESS_EVERY: usize = 1 << 20;

/// Byte order of the records in a dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endian {
    Little,
    Big,
    /// The byte order of the machine that wrote the file, assumed to be this one
    #[default]
    Native,
}

impl Endian {
    fn decode(self, record: [u8; RECORD_LEN]) -> i32 {
        match self {
            Endian::Little => i32::from_le_bytes(record),
            Endian::Big => i32::from_be_bytes(record),
            Endian::Native => i32::from_ne_bytes(record),
        }
    }
}

impl FromStr for Endian {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "little" | "le" => Ok(Endian::Little),
            "big" | "be" => Ok(Endian::Big),
            "native" | "ne" => Ok(Endian::Native),
            other => Err(format!(
                "unknown byte order {other:?}, expected little, big or native"
            )),
        }
    }
}

/// What a load read from its stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadSummary {
    /// Full records read and inserted
    pub records: usize,
    /// Distinct keys among those records
    pub distinct: usize,
    /// Bytes at the end of the stream too short to form a record
    pub trailing_bytes: usize,
}

/// Open `path` and insert every record in it into `tree`
pub fn load_file<P, R>(path: P, endian: Endian, tree: &mut RandomizedTree<i32, R>) -> Result<LoadSummary>
where
    P: AsRef<Path>,
    R: Randomness,
{
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| Error::Open {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("loading {}", path.display());
    load(file, endian, tree)
}

/// Insert every record read from `reader` into `tree`
pub fn load<I, R>(reader: I, endian: Endian, tree: &mut RandomizedTree<i32, R>) -> Result<LoadSummary>
where
    I: Read,
    R: Randomness,
{
    let mut reader = BufReader::new(reader);
    let mut seen = FxHashSet::default();
    let mut summary = LoadSummary::default();
    let mut record = [0u8; RECORD_LEN];

    loop {
        let filled = read_record(&mut reader, &mut record)?;
        if filled < RECORD_LEN {
            summary.trailing_bytes = filled;
            break;
        }
        let key = endian.decode(record);
        seen.insert(key);
        tree.insert(key);
        summary.records += 1;
        if summary.records % PROGRESS_EVERY == 0 {
            debug!("loaded {} records", summary.records);
        }
    }
    summary.distinct = seen.len();

    if summary.trailing_bytes > 0 {
        warn!(
            "ignoring {} trailing bytes after the last full record",
            summary.trailing_bytes
        );
    }
    info!(
        "loaded {} records ({} distinct keys), tree height {}",
        summary.records,
        summary.distinct,
        tree.height()
    );
    Ok(summary)
}

// Fill `record` as far as the stream allows, returning the number of bytes read
fn read_record<I: Read>(reader: &mut I, record: &mut [u8; RECORD_LEN]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < RECORD_LEN {
        match reader.read(&mut record[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::{load, load_file, Endian, LoadSummary};
    use crate::{Error, RandomizedTree};
    use std::io::{self, Cursor, Read};

    fn encode(keys: &[i32]) -> Vec<u8> {
        keys.iter().flat_map(|k| k.to_le_bytes()).collect()
    }

    // Hands out at most one byte per read call
    struct Trickle(Cursor<Vec<u8>>);

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let end = buf.len().min(1);
            self.0.read(&mut buf[..end])
        }
    }

    #[test]
    fn test_load_records() {
        let mut tree = RandomizedTree::with_seed(42);
        let bytes = encode(&[5, 3, 8, 1, 4, -7, 3]);
        let summary = load(Cursor::new(bytes), Endian::Little, &mut tree).unwrap();

        assert_eq!(
            summary,
            LoadSummary {
                records: 7,
                distinct: 6,
                trailing_bytes: 0,
            }
        );
        assert_eq!(tree.len(), 7);
        assert_eq!(tree.smallest(3), vec![-7, 1, 3]);
        assert!(tree.is_consistent());
    }

    #[test]
    fn test_trailing_partial_record_is_ignored() {
        let mut tree = RandomizedTree::with_seed(42);
        let mut bytes = encode(&[10, 20]);
        bytes.extend_from_slice(&[0xff, 0xff, 0xff]);
        let summary = load(Cursor::new(bytes), Endian::Little, &mut tree).unwrap();

        assert_eq!(summary.records, 2);
        assert_eq!(summary.trailing_bytes, 3);
        assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![10, 20]);
    }

    #[test]
    fn test_short_reads() {
        let mut tree = RandomizedTree::with_seed(42);
        let reader = Trickle(Cursor::new(encode(&[1, 2, 3])));
        let summary = load(reader, Endian::Little, &mut tree).unwrap();
        assert_eq!(summary.records, 3);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_byte_order() {
        let bytes = vec![0x00, 0x00, 0x01, 0x00];

        let mut tree = RandomizedTree::with_seed(42);
        load(Cursor::new(bytes.clone()), Endian::Little, &mut tree).unwrap();
        assert!(tree.contains(&0x0001_0000));

        let mut tree = RandomizedTree::with_seed(42);
        load(Cursor::new(bytes), Endian::Big, &mut tree).unwrap();
        assert!(tree.contains(&0x100));
    }

    #[test]
    fn test_empty_stream() {
        let mut tree = RandomizedTree::with_seed(42);
        let summary = load(Cursor::new(Vec::new()), Endian::Native, &mut tree).unwrap();
        assert_eq!(summary, LoadSummary::default());
        assert!(tree.is_empty());
    }

    #[test]
    fn test_missing_file() {
        let mut tree = RandomizedTree::with_seed(42);
        let result = load_file("no/such/dataset.bin", Endian::Native, &mut tree);
        assert!(matches!(result, Err(Error::Open { .. })));
    }

    #[test]
    fn test_endian_names() {
        assert_eq!("little".parse::<Endian>(), Ok(Endian::Little));
        assert_eq!("BE".parse::<Endian>(), Ok(Endian::Big));
        assert_eq!("native".parse::<Endian>(), Ok(Endian::Native));
        assert!("middle".parse::<Endian>().is_err());
    }
}

/// Sequencer metadata carried in read names
///
/// This module handles:
/// - Splitting Illumina read names into instrument, flow-cell, lane, tile and
///   colony coordinate fields
/// - Interning the repeated string fields so records share storage
mod intern;

pub use intern::Interner;

use std::sync::Arc;

use crate::error::Error;

/// Colony position on a tile, in coordinate ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

/// Metadata for one read pair, with string fields interned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub instrument: Arc<str>,
    pub run: Option<u32>,
    pub flow_cell: Arc<str>,
    pub lane: u8,
    pub tile: u32,
    pub coordinate: Coordinate,
    pub multiplex_tag: Arc<str>,
    pub mate: Option<u8>,
}

/// Fields borrowed from a read name before interning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameFields<'a> {
    pub instrument: &'a str,
    pub run: Option<u32>,
    pub flow_cell: &'a str,
    pub lane: u8,
    pub tile: u32,
    pub coordinate: Coordinate,
    pub multiplex_tag: &'a str,
    pub mate: Option<u8>,
}

impl NameFields<'_> {
    /// Intern the string fields into owned metadata.
    pub fn intern(&self, interner: &mut Interner) -> Metadata {
        Metadata {
            instrument: interner.intern(self.instrument),
            run: self.run,
            flow_cell: interner.intern(self.flow_cell),
            lane: self.lane,
            tile: self.tile,
            coordinate: self.coordinate,
            multiplex_tag: interner.intern(self.multiplex_tag),
            mate: self.mate,
        }
    }
}

/// Source of sequencer metadata for a read name.
pub trait NameParser: Sync {
    fn parse<'a>(&self, name: &'a str) -> Result<NameFields<'a>, Error>;
}

/// Parser for Illumina read names.
///
/// Accepts the Casava 1.8 layout
/// `instrument:run:flowcell:lane:tile:x:y` and the older
/// `instrument:lane:tile:x:y[#multiplex][/mate]` layout, which carries no
/// run number or flow-cell id.
#[derive(Debug, Default, Clone, Copy)]
pub struct IlluminaNames;

impl NameParser for IlluminaNames {
    fn parse<'a>(&self, name: &'a str) -> Result<NameFields<'a>, Error> {
        let (body, mate) = split_mate(name);
        let (body, multiplex_tag) = match body.split_once('#') {
            Some((b, tag)) => (b, tag),
            None => (body, ""),
        };

        let fields: Vec<&str> = body.split(':').collect();
        match *fields.as_slice() {
            [instrument, run, flow_cell, lane, tile, x, y] => Ok(NameFields {
                instrument,
                run: Some(number(name, "run", run)?),
                flow_cell,
                lane: number(name, "lane", lane)?,
                tile: number(name, "tile", tile)?,
                coordinate: Coordinate {
                    x: number(name, "x", x)?,
                    y: number(name, "y", y)?,
                },
                multiplex_tag,
                mate,
            }),
            [instrument, lane, tile, x, y] => Ok(NameFields {
                instrument,
                run: None,
                flow_cell: "",
                lane: number(name, "lane", lane)?,
                tile: number(name, "tile", tile)?,
                coordinate: Coordinate {
                    x: number(name, "x", x)?,
                    y: number(name, "y", y)?,
                },
                multiplex_tag,
                mate,
            }),
            _ => Err(Error::metadata(
                name,
                format!("expected 5 or 7 ':'-separated fields, found {}", fields.len()),
            )),
        }
    }
}

/// Strip a trailing `/1` or `/2` mate marker.
fn split_mate(name: &str) -> (&str, Option<u8>) {
    if let Some((body, mate)) = name.rsplit_once('/') {
        if let Ok(m) = mate.parse::<u8>() {
            return (body, Some(m));
        }
    }
    (name, None)
}

fn number<T: std::str::FromStr>(name: &str, field: &str, value: &str) -> Result<T, Error> {
    value
        .parse()
        .map_err(|_| Error::metadata(name, format!("invalid {field} field '{value}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn casava_1_8_name() {
        let f = IlluminaNames
            .parse("EAS139:136:FC706VJ:2:2104:15343:197393")
            .unwrap();
        assert_eq!(f.instrument, "EAS139");
        assert_eq!(f.run, Some(136));
        assert_eq!(f.flow_cell, "FC706VJ");
        assert_eq!(f.lane, 2);
        assert_eq!(f.tile, 2104);
        assert_eq!(f.coordinate, Coordinate { x: 15343, y: 197393 });
        assert_eq!(f.multiplex_tag, "");
        assert_eq!(f.mate, None);
    }

    #[test]
    fn pre_1_8_name() {
        let f = IlluminaNames
            .parse("HWUSI-EAS100R:6:73:941:1973#ATCACG/1")
            .unwrap();
        assert_eq!(f.instrument, "HWUSI-EAS100R");
        assert_eq!(f.run, None);
        assert_eq!(f.flow_cell, "");
        assert_eq!(f.lane, 6);
        assert_eq!(f.tile, 73);
        assert_eq!(f.coordinate, Coordinate { x: 941, y: 1973 });
        assert_eq!(f.multiplex_tag, "ATCACG");
        assert_eq!(f.mate, Some(1));
    }

    #[test]
    fn rejects_wrong_field_count() {
        let err = IlluminaNames.parse("read1").unwrap_err();
        assert!(err.to_string().contains("read1"));
        assert!(err.to_string().contains("found 1"));
    }

    #[test]
    fn rejects_non_numeric_tile() {
        let err = IlluminaNames
            .parse("EAS139:136:FC706VJ:2:tile:15343:197393")
            .unwrap_err();
        assert!(err.to_string().contains("invalid tile field 'tile'"));
    }

    #[test]
    fn interned_metadata_shares_storage() {
        let mut interner = Interner::new();
        let a = IlluminaNames
            .parse("EAS139:136:FC706VJ:2:2104:1:1")
            .unwrap()
            .intern(&mut interner);
        let b = IlluminaNames
            .parse("EAS139:136:FC706VJ:2:2104:2:2")
            .unwrap()
            .intern(&mut interner);
        assert!(Arc::ptr_eq(&a.flow_cell, &b.flow_cell));
        assert!(Arc::ptr_eq(&a.instrument, &b.instrument));
        assert_ne!(a, b);
    }
}

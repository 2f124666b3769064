use super::{Cursor, Dispatch, ScriptFormat};
use crate::error;
use crate::error::{Result, SubroutineId};
use crate::resource::ResourceBundle;
use std::rc::Rc;
use tracing::{debug, info};

/// Verb/noun match filter carried by lines of the verb dispatcher
/// (subroutine 0). `-1` matches anything; `-2` matches only "none".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineFilter {
    pub verb: i16,
    pub noun1: i16,
    pub noun2: i16,
}

impl LineFilter {
    pub const ANY: LineFilter = LineFilter {
        verb: -1,
        noun1: -1,
        noun2: -1,
    };

    fn field(filter: i16, value: i16) -> bool {
        filter == -1 || filter == value || (filter == -2 && value == -1)
    }

    pub fn matches(&self, verb: i16, noun1: i16, noun2: i16) -> bool {
        LineFilter::field(self.verb, verb)
            && LineFilter::field(self.noun1, noun1)
            && LineFilter::field(self.noun2, noun2)
    }
}

#[derive(Debug, Clone)]
pub struct SubroutineLine {
    pub filter: Option<LineFilter>,
    pub code: Rc<[u8]>,
}

#[derive(Debug, Clone)]
pub struct Subroutine {
    pub id: SubroutineId,
    pub lines: Vec<SubroutineLine>,
}

/// Parses a table file: `{0, id, {0, line}* 1}* 1`, where a line of
/// subroutine 0 starts with its three filter words and every line runs
/// to its end marker. Operand widths come from the opcode table.
pub fn parse_table_file(data: &[u8], format: ScriptFormat, dispatch: &Dispatch) -> Result<Vec<Subroutine>> {
    let mut cursor = Cursor::new(Rc::from(data));
    let mut subs = vec![];
    while cursor.word()? == 0 {
        let id = cursor.word()?;
        let mut lines = vec![];
        while cursor.word()? == 0 {
            let filter = if id == 0 {
                Some(LineFilter {
                    verb: cursor.word()? as i16,
                    noun1: cursor.word()? as i16,
                    noun2: cursor.word()? as i16,
                })
            } else {
                None
            };
            let start = cursor.pos();
            scan_line(&mut cursor, format, dispatch).map_err(|e| e.in_subroutine(id))?;
            lines.push(SubroutineLine {
                filter,
                code: Rc::from(&data[start..cursor.pos()]),
            });
        }
        subs.push(Subroutine { id, lines });
    }
    Ok(subs)
}

fn scan_line(cursor: &mut Cursor, format: ScriptFormat, dispatch: &Dispatch) -> Result<()> {
    loop {
        let mut code = cursor.opcode(format)?;
        if code == format.invert_marker() {
            code = cursor.opcode(format)?;
        }
        if code == format.end_marker() {
            return Ok(());
        }
        let def = dispatch
            .lookup(code)
            .map_err(|e| error!(BadTableData; "{}", e))?;
        for arg in def.args {
            cursor.sized(arg.size(format))?;
        }
    }
}

/// Id ranges served by each table file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableIndex {
    files: Vec<(String, Vec<(u16, u16)>)>,
}

impl TableIndex {
    pub fn new() -> TableIndex {
        TableIndex::default()
    }

    pub fn with_file(mut self, name: &str, ranges: &[(u16, u16)]) -> TableIndex {
        self.files.push((name.to_string(), ranges.to_vec()));
        self
    }

    /// `{name NUL {min max}* 0}* NUL`, big-endian words.
    pub fn parse(data: &[u8]) -> Result<TableIndex> {
        let mut index = TableIndex::new();
        let mut pos = 0;
        let word = |pos: &mut usize| -> Result<u16> {
            match data.get(*pos..*pos + 2) {
                Some(w) => {
                    *pos += 2;
                    Ok(u16::from_be_bytes([w[0], w[1]]))
                }
                None => Err(error!(BadTableData; "table index truncated")),
            }
        };
        loop {
            let end = match data[pos.min(data.len())..].iter().position(|b| *b == 0) {
                Some(n) => pos + n,
                None => return Err(error!(BadTableData; "table index truncated")),
            };
            if end == pos {
                return Ok(index);
            }
            let name = String::from_utf8_lossy(&data[pos..end]).to_string();
            pos = end + 1;
            let mut ranges = vec![];
            loop {
                let min = word(&mut pos)?;
                if min == 0 {
                    break;
                }
                ranges.push((min, word(&mut pos)?));
            }
            index.files.push((name, ranges));
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = vec![];
        for (name, ranges) in &self.files {
            out.extend_from_slice(name.as_bytes());
            out.push(0);
            for (min, max) in ranges {
                out.extend_from_slice(&min.to_be_bytes());
                out.extend_from_slice(&max.to_be_bytes());
            }
            out.extend_from_slice(&[0, 0]);
        }
        out.push(0);
        out
    }

    pub fn file_for(&self, id: SubroutineId) -> Option<&str> {
        self.files
            .iter()
            .find(|(_, ranges)| ranges.iter().any(|(min, max)| id >= *min && id <= *max))
            .map(|(name, _)| name.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Mark {
    used: usize,
    count: usize,
}

/// ## Tables heap
///
/// Bump arena of resident subroutines. Three regions, bottom up: the
/// protected baseline, the current extra table file, the current paged
/// table file. Loading a file discards everything above its region's
/// start mark.

#[derive(Debug)]
pub struct TablesHeap {
    capacity: usize,
    used: usize,
    subs: Vec<Rc<Subroutine>>,
    baseline: Mark,
    paged: Mark,
}

impl TablesHeap {
    pub fn new(capacity: usize) -> TablesHeap {
        TablesHeap {
            capacity,
            used: 0,
            subs: vec![],
            baseline: Mark::default(),
            paged: Mark::default(),
        }
    }

    pub fn used(&self) -> usize {
        self.used
    }

    pub fn len(&self) -> usize {
        self.subs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subs.is_empty()
    }

    fn mark(&self) -> Mark {
        Mark {
            used: self.used,
            count: self.subs.len(),
        }
    }

    fn reset_to(&mut self, mark: Mark) {
        self.used = mark.used;
        self.subs.truncate(mark.count);
    }

    fn append(&mut self, subs: Vec<Subroutine>, size: usize) -> Result<()> {
        let aligned = (size + 3) & !3;
        if self.used + aligned > self.capacity {
            return Err(error!(OutOfTableMemory; "{} + {} > {}", self.used, aligned, self.capacity));
        }
        self.used += aligned;
        self.subs.extend(subs.into_iter().map(Rc::new));
        Ok(())
    }

    /// Most recently loaded wins when ids repeat.
    pub fn find(&self, id: SubroutineId) -> Option<Rc<Subroutine>> {
        self.subs.iter().rev().find(|s| s.id == id).cloned()
    }
}

pub struct SubroutineTable {
    heap: TablesHeap,
    index: TableIndex,
    extra_index: TableIndex,
    paged_file: Option<String>,
    extra_file: Option<String>,
}

impl SubroutineTable {
    pub fn new(capacity: usize, index: TableIndex, extra_index: TableIndex) -> SubroutineTable {
        SubroutineTable {
            heap: TablesHeap::new(capacity),
            index,
            extra_index,
            paged_file: None,
            extra_file: None,
        }
    }

    pub fn heap(&self) -> &TablesHeap {
        &self.heap
    }

    pub fn paged_file(&self) -> Option<&str> {
        self.paged_file.as_deref()
    }

    pub fn extra_file(&self) -> Option<&str> {
        self.extra_file.as_deref()
    }

    /// Loads subroutines that stay resident for the whole session.
    pub fn load_baseline(&mut self, data: &[u8], format: ScriptFormat, dispatch: &Dispatch) -> Result<()> {
        let subs = parse_table_file(data, format, dispatch)?;
        self.heap.reset_to(self.heap.paged);
        self.heap.append(subs, data.len())?;
        self.heap.baseline = self.heap.mark();
        self.heap.paged = self.heap.baseline;
        self.paged_file = None;
        self.extra_file = None;
        Ok(())
    }

    /// Resident lookup, then the extra table files, then the paged table
    /// files. `None` when no file provides the id.
    pub fn get(
        &mut self,
        id: SubroutineId,
        resources: &dyn ResourceBundle,
        format: ScriptFormat,
        dispatch: &Dispatch,
    ) -> Result<Option<Rc<Subroutine>>> {
        if let Some(sub) = self.heap.find(id) {
            return Ok(Some(sub));
        }
        if let Some(name) = self.extra_index.file_for(id).map(str::to_string) {
            let data = load_file(resources, &name)?;
            let subs = parse_table_file(&data, format, dispatch)?;
            info!(file = %name, id, "paging extra tables");
            self.heap.reset_to(self.heap.baseline);
            self.heap.append(subs, data.len())?;
            self.heap.paged = self.heap.mark();
            self.extra_file = Some(name);
            self.paged_file = None;
            if let Some(sub) = self.heap.find(id) {
                return Ok(Some(sub));
            }
        }
        if let Some(name) = self.index.file_for(id).map(str::to_string) {
            let data = load_file(resources, &name)?;
            let subs = parse_table_file(&data, format, dispatch)?;
            info!(file = %name, id, "paging tables");
            self.heap.reset_to(self.heap.paged);
            self.heap.append(subs, data.len())?;
            self.paged_file = Some(name);
            if let Some(sub) = self.heap.find(id) {
                return Ok(Some(sub));
            }
        }
        debug!(id, "subroutine not found");
        Ok(None)
    }
}

fn load_file(resources: &dyn ResourceBundle, name: &str) -> Result<Vec<u8>> {
    match resources.table_file(name) {
        Some(data) => Ok(data),
        None => Err(error!(BadTableData; "missing table file {}", name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn sub(id: SubroutineId) -> Subroutine {
        Subroutine { id, lines: vec![] }
    }

    #[test]
    fn test_filter_none_marker() {
        let f = LineFilter {
            verb: 4,
            noun1: -2,
            noun2: -1,
        };
        assert!(f.matches(4, -1, 9));
        assert!(!f.matches(4, 2, 9));
        assert!(!f.matches(5, -1, -1));
        assert!(LineFilter::ANY.matches(1, 2, 3));
    }

    #[test]
    fn test_index_encoding() {
        let index = TableIndex::new()
            .with_file("TABLES01", &[(1, 99), (400, 410)])
            .with_file("TABLES02", &[(100, 199)]);
        let data = index.encode();
        assert_eq!(TableIndex::parse(&data).unwrap(), index);
        assert_eq!(index.file_for(405), Some("TABLES01"));
        assert_eq!(index.file_for(150), Some("TABLES02"));
        assert_eq!(index.file_for(300), None);
        let err = TableIndex::parse(&data[..data.len() - 1]).unwrap_err();
        assert!(err.is(ErrorCode::BadTableData));
    }

    #[test]
    fn test_heap_regions() {
        let mut heap = TablesHeap::new(16);
        heap.append(vec![sub(1)], 5).unwrap();
        assert_eq!(heap.used(), 8);
        heap.baseline = heap.mark();
        heap.append(vec![sub(2), sub(1)], 6).unwrap();
        assert_eq!(heap.used(), 16);
        assert_eq!(heap.len(), 3);
        assert!(Rc::ptr_eq(&heap.find(1).unwrap(), &heap.subs[2]));
        let err = heap.append(vec![sub(3)], 1).unwrap_err();
        assert!(err.is(ErrorCode::OutOfTableMemory));
        heap.reset_to(heap.baseline);
        assert_eq!(heap.used(), 8);
        assert!(heap.find(2).is_none());
    }
}

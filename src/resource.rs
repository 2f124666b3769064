use std::collections::HashMap;
use std::path::PathBuf;
use tracing::debug;

/// ## Resource bundle
///
/// Raw blocks the engine loads on demand. Decoding compressed game
/// archives happens behind this trait; the engine only sees table files,
/// table indices, zone blocks and message text.

pub trait ResourceBundle {
    /// Subroutines resident for the whole session.
    fn base_tables(&self) -> Option<Vec<u8>>;
    fn table_index(&self) -> Option<Vec<u8>>;
    fn extra_table_index(&self) -> Option<Vec<u8>>;
    fn table_file(&self, name: &str) -> Option<Vec<u8>>;
    fn zone(&self, zone: u16) -> Option<Vec<u8>>;
    fn text(&self, id: u16) -> Option<String>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryBundle {
    base: Option<Vec<u8>>,
    index: Option<Vec<u8>>,
    extra_index: Option<Vec<u8>>,
    files: HashMap<String, Vec<u8>>,
    zones: HashMap<u16, Vec<u8>>,
    texts: HashMap<u16, String>,
}

impl MemoryBundle {
    pub fn new() -> MemoryBundle {
        MemoryBundle::default()
    }

    pub fn with_base_tables(mut self, data: Vec<u8>) -> Self {
        self.base = Some(data);
        self
    }

    pub fn with_table_index(mut self, data: Vec<u8>) -> Self {
        self.index = Some(data);
        self
    }

    pub fn with_extra_table_index(mut self, data: Vec<u8>) -> Self {
        self.extra_index = Some(data);
        self
    }

    pub fn with_table_file(mut self, name: &str, data: Vec<u8>) -> Self {
        self.files.insert(name.to_string(), data);
        self
    }

    pub fn with_zone(mut self, zone: u16, data: Vec<u8>) -> Self {
        self.zones.insert(zone, data);
        self
    }

    pub fn with_text(mut self, id: u16, text: &str) -> Self {
        self.texts.insert(id, text.to_string());
        self
    }
}

impl ResourceBundle for MemoryBundle {
    fn base_tables(&self) -> Option<Vec<u8>> {
        self.base.clone()
    }

    fn table_index(&self) -> Option<Vec<u8>> {
        self.index.clone()
    }

    fn extra_table_index(&self) -> Option<Vec<u8>> {
        self.extra_index.clone()
    }

    fn table_file(&self, name: &str) -> Option<Vec<u8>> {
        self.files.get(name).cloned()
    }

    fn zone(&self, zone: u16) -> Option<Vec<u8>> {
        self.zones.get(&zone).cloned()
    }

    fn text(&self, id: u16) -> Option<String> {
        self.texts.get(&id).cloned()
    }
}

/// Bundle unpacked into a directory:
///
/// ```text
/// tables.bin      base tables
/// tables.idx      table index
/// extra.idx       extra table index
/// <name>          table files named by the indices
/// zone<n>.vga     zone blocks
/// text.txt        messages, one per line, numbered from 0
/// ```
#[derive(Debug, Clone)]
pub struct DirBundle {
    root: PathBuf,
    texts: Vec<String>,
}

impl DirBundle {
    pub fn open<P: Into<PathBuf>>(root: P) -> std::io::Result<DirBundle> {
        let root = root.into();
        if !root.is_dir() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} is not a directory", root.display()),
            ));
        }
        let texts = match std::fs::read_to_string(root.join("text.txt")) {
            Ok(s) => s.lines().map(str::to_string).collect(),
            Err(_) => vec![],
        };
        Ok(DirBundle { root, texts })
    }

    fn read(&self, name: &str) -> Option<Vec<u8>> {
        match std::fs::read(self.root.join(name)) {
            Ok(data) => Some(data),
            Err(e) => {
                debug!(file = name, error = %e, "resource not read");
                None
            }
        }
    }
}

impl ResourceBundle for DirBundle {
    fn base_tables(&self) -> Option<Vec<u8>> {
        self.read("tables.bin")
    }

    fn table_index(&self) -> Option<Vec<u8>> {
        self.read("tables.idx")
    }

    fn extra_table_index(&self) -> Option<Vec<u8>> {
        self.read("extra.idx")
    }

    fn table_file(&self, name: &str) -> Option<Vec<u8>> {
        if name.contains('/') || name.contains("..") {
            return None;
        }
        self.read(name)
    }

    fn zone(&self, zone: u16) -> Option<Vec<u8>> {
        self.read(&format!("zone{}.vga", zone))
    }

    fn text(&self, id: u16) -> Option<String> {
        self.texts.get(id as usize).cloned()
    }
}

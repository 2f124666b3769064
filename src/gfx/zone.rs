use crate::error;
use crate::error::Result;
use crate::resource::ResourceBundle;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::debug;

/// Position in a zone's VGA script.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ScriptPtr {
    pub zone: u16,
    pub offset: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub width: u16,
    pub height: u16,
    pub pixels: Vec<u8>,
}

impl Image {
    /// Pads or truncates `pixels` to `width * height`.
    pub fn new(width: u16, height: u16, mut pixels: Vec<u8>) -> Image {
        pixels.resize(width as usize * height as usize, 0);
        Image {
            width,
            height,
            pixels,
        }
    }
}

/// ## Zone data
///
/// One VGA resource block: the animation entry points, the images they
/// draw, a palette and the script bytecode itself. Big-endian layout:
///
/// ```text
/// u16 count, {u16 animation id, u16 script offset}*
/// u16 count, {u16 width, u16 height, width*height pixels}*
/// u16 palette bytes, palette
/// u32 script bytes, script
/// ```

#[derive(Debug, Clone, Default)]
pub struct ZoneData {
    pub animations: Vec<(u16, u16)>,
    pub images: Vec<Image>,
    pub palette: Vec<u8>,
    pub script: Rc<[u8]>,
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        match self.data.get(self.pos..self.pos + n) {
            Some(s) => {
                self.pos += n;
                Ok(s)
            }
            None => Err(error!(BadTableData; "zone data truncated at {}", self.pos)),
        }
    }

    fn word(&mut self) -> Result<u16> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }
}

impl ZoneData {
    pub fn decode(data: &[u8]) -> Result<ZoneData> {
        let mut r = Reader { data, pos: 0 };
        let mut zone = ZoneData::default();
        for _ in 0..r.word()? {
            let id = r.word()?;
            let offset = r.word()?;
            zone.animations.push((id, offset));
        }
        for _ in 0..r.word()? {
            let w = r.word()?;
            let h = r.word()?;
            let pixels = r.take(w as usize * h as usize)?.to_vec();
            zone.images.push(Image::new(w, h, pixels));
        }
        let len = r.word()? as usize;
        zone.palette = r.take(len)?.to_vec();
        let hi = r.word()? as usize;
        let lo = r.word()? as usize;
        zone.script = Rc::from(r.take(hi << 16 | lo)?);
        Ok(zone)
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = vec![];
        out.extend_from_slice(&(self.animations.len() as u16).to_be_bytes());
        for (id, offset) in &self.animations {
            out.extend_from_slice(&id.to_be_bytes());
            out.extend_from_slice(&offset.to_be_bytes());
        }
        out.extend_from_slice(&(self.images.len() as u16).to_be_bytes());
        for image in &self.images {
            out.extend_from_slice(&image.width.to_be_bytes());
            out.extend_from_slice(&image.height.to_be_bytes());
            out.extend_from_slice(&image.pixels);
        }
        out.extend_from_slice(&(self.palette.len() as u16).to_be_bytes());
        out.extend_from_slice(&self.palette);
        out.extend_from_slice(&(self.script.len() as u32).to_be_bytes());
        out.extend_from_slice(&self.script);
        out
    }

    pub fn animation(&self, id: u16) -> Option<u16> {
        self.animations.iter().find(|(a, _)| *a == id).map(|(_, o)| *o)
    }

    /// Images are numbered from 1; 0 means "no image".
    pub fn image(&self, id: u16) -> Option<&Image> {
        match id {
            0 => None,
            n => self.images.get(n as usize - 1),
        }
    }
}

/// Loaded zones by number.
#[derive(Debug, Default)]
pub struct Zones {
    zones: HashMap<u16, ZoneData>,
}

impl Zones {
    pub fn new() -> Zones {
        Zones::default()
    }

    pub fn is_loaded(&self, zone: u16) -> bool {
        self.zones.contains_key(&zone)
    }

    /// Returns false when the bundle has no such zone.
    pub fn load(&mut self, zone: u16, resources: &dyn ResourceBundle) -> Result<bool> {
        if self.is_loaded(zone) {
            return Ok(true);
        }
        match resources.zone(zone) {
            Some(data) => {
                self.zones.insert(zone, ZoneData::decode(&data)?);
                Ok(true)
            }
            None => {
                debug!(zone, "zone not in bundle");
                Ok(false)
            }
        }
    }

    pub fn get(&self, zone: u16) -> Result<&ZoneData> {
        match self.zones.get(&zone) {
            Some(z) => Ok(z),
            None => Err(error!(ZoneNotFound; "zone {}", zone)),
        }
    }

    pub fn image(&self, zone: u16, image: u16) -> Option<&Image> {
        self.zones.get(&zone).and_then(|z| z.image(image))
    }

    pub fn clear(&mut self) {
        self.zones.clear();
    }
}

use super::Image;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i16,
    pub y: i16,
    pub w: i16,
    pub h: i16,
}

impl Rect {
    pub fn new(x: i16, y: i16, w: i16, h: i16) -> Rect {
        Rect { x, y, w, h }
    }

    pub fn right(&self) -> i16 {
        self.x.saturating_add(self.w)
    }

    pub fn bottom(&self) -> i16 {
        self.y.saturating_add(self.h)
    }

    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    pub fn contains(&self, x: i16, y: i16) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    pub fn union(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect::new(x, y, self.right().max(other.right()) - x, self.bottom().max(other.bottom()) - y)
    }

    pub fn clip(&self, width: usize, height: usize) -> Rect {
        let x = self.x.max(0);
        let y = self.y.max(0);
        let right = (self.right() as i32).min(width as i32) as i16;
        let bottom = (self.bottom() as i32).min(height as i32) as i16;
        Rect::new(x, y, (right - x).max(0), (bottom - y).max(0))
    }
}

/// Eight-bit indexed pixel buffer.
#[derive(Clone, PartialEq, Eq)]
pub struct Surface {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Surface({}x{})", self.width, self.height)
    }
}

impl Surface {
    pub fn new(width: usize, height: usize) -> Surface {
        Surface {
            width,
            height,
            pixels: vec![0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width as i16, self.height as i16)
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u8> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    pub fn fill(&mut self, color: u8) {
        for p in self.pixels.iter_mut() {
            *p = color;
        }
    }

    pub fn fill_rect(&mut self, rect: Rect, color: u8) -> Rect {
        let r = rect.clip(self.width, self.height);
        for y in r.y..r.bottom() {
            let row = y as usize * self.width;
            for x in r.x..r.right() {
                self.pixels[row + x as usize] = color;
            }
        }
        r
    }

    /// Draws with color 0 transparent. Returns the clipped area touched.
    pub fn draw_image(&mut self, image: &Image, x: i16, y: i16) -> Rect {
        let area = Rect::new(x, y, image.width as i16, image.height as i16);
        let r = area.clip(self.width, self.height);
        for dy in r.y..r.bottom() {
            let src_row = (dy - y) as usize * image.width as usize;
            let dst_row = dy as usize * self.width;
            for dx in r.x..r.right() {
                let color = image.pixels[src_row + (dx - x) as usize];
                if color != 0 {
                    self.pixels[dst_row + dx as usize] = color;
                }
            }
        }
        r
    }

    /// Copies a clipped region out, row major.
    pub fn read_rect(&self, rect: Rect) -> (Rect, Vec<u8>) {
        let r = rect.clip(self.width, self.height);
        let mut out = Vec::with_capacity((r.w.max(0) as usize) * (r.h.max(0) as usize));
        for y in r.y..r.bottom() {
            let row = y as usize * self.width;
            out.extend_from_slice(&self.pixels[row + r.x as usize..row + r.right() as usize]);
        }
        (r, out)
    }

    /// Writes back a region produced by `read_rect`.
    pub fn write_rect(&mut self, rect: Rect, data: &[u8]) {
        let w = rect.w.max(0) as usize;
        for (i, y) in (rect.y..rect.bottom()).enumerate() {
            let row = y as usize * self.width + rect.x as usize;
            if let Some(src) = data.get(i * w..(i + 1) * w) {
                self.pixels[row..row + w].copy_from_slice(src);
            }
        }
    }

    /// Copies a region into a locked presentation buffer.
    pub fn copy_to(&self, rect: Rect, dst: &mut [u8], pitch: usize) {
        let r = rect.clip(self.width, self.height);
        for y in r.y..r.bottom() {
            let src = y as usize * self.width;
            let out = y as usize * pitch;
            let (a, b) = (r.x as usize, r.right() as usize);
            if let Some(d) = dst.get_mut(out + a..out + b) {
                d.copy_from_slice(&self.pixels[src + a..src + b]);
            }
        }
    }
}

/// ## Presentation surface
///
/// The platform frame the composed back buffer is flushed to.

pub trait Screen {
    fn size(&self) -> (usize, usize);
    /// Pixel buffer and its pitch in bytes.
    fn lock(&mut self) -> (&mut [u8], usize);
    /// RGB triples.
    fn set_palette(&mut self, palette: &[u8]);
    fn update(&mut self, rect: Rect);

    fn blit(&mut self, src: &Surface, rect: Rect) {
        {
            let (pixels, pitch) = self.lock();
            src.copy_to(rect, pixels, pitch);
        }
        self.update(rect);
    }
}

#[derive(Debug, Clone)]
pub struct MemoryScreen {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
    palette: Vec<u8>,
    updates: Vec<Rect>,
}

impl MemoryScreen {
    pub fn new(width: usize, height: usize) -> MemoryScreen {
        MemoryScreen {
            width,
            height,
            pixels: vec![0; width * height],
            palette: vec![],
            updates: vec![],
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        self.pixels[y * self.width + x]
    }

    pub fn palette(&self) -> &[u8] {
        &self.palette
    }

    pub fn updates(&self) -> &[Rect] {
        &self.updates
    }

    pub fn take_updates(&mut self) -> Vec<Rect> {
        std::mem::take(&mut self.updates)
    }
}

impl Screen for MemoryScreen {
    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn lock(&mut self) -> (&mut [u8], usize) {
        (&mut self.pixels, self.width)
    }

    fn set_palette(&mut self, palette: &[u8]) {
        self.palette = palette.to_vec();
    }

    fn update(&mut self, rect: Rect) {
        self.updates.push(rect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_union_and_clip() {
        let a = Rect::new(10, 10, 5, 5);
        let b = Rect::new(0, 12, 4, 20);
        assert_eq!(a.union(&b), Rect::new(0, 10, 15, 22));
        assert_eq!(Rect::new(-5, 190, 20, 20).clip(320, 200), Rect::new(0, 190, 15, 10));
        assert_eq!(Rect::default().union(&a), a);
    }

    #[test]
    fn test_transparent_draw_and_restore() {
        let mut s = Surface::new(8, 8);
        s.fill(9);
        let (r, saved) = s.read_rect(Rect::new(1, 1, 2, 2));
        let image = Image::new(2, 2, vec![5, 0, 0, 5]);
        s.draw_image(&image, 1, 1);
        assert_eq!(s.pixel(1, 1), Some(5));
        assert_eq!(s.pixel(2, 1), Some(9));
        s.write_rect(r, &saved);
        assert_eq!(s.pixel(1, 1), Some(9));
        assert_eq!(s.pixel(2, 2), Some(9));
    }

    #[test]
    fn test_blit_only_touches_rect() {
        let mut s = Surface::new(4, 4);
        s.fill(3);
        let mut screen = MemoryScreen::new(4, 4);
        screen.blit(&s, Rect::new(1, 1, 2, 1));
        assert_eq!(screen.pixel(1, 1), 3);
        assert_eq!(screen.pixel(0, 0), 0);
        assert_eq!(screen.updates(), &[Rect::new(1, 1, 2, 1)]);
    }
}

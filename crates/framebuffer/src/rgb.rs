#[derive(Eq, PartialEq, Clone, Copy, Ord, PartialOrd, Debug, Default, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const DARK_GRAY: Rgb = Rgb::new(23, 23, 23);
    pub const LIGHT_GRAY: Rgb = Rgb::new(180, 180, 180);
    pub const GREEN: Rgb = Rgb::new(0, 200, 0);
    pub const YELLOW: Rgb = Rgb::new(255, 255, 0);
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const ORANGE: Rgb = Rgb::new(255, 165, 0);
    pub const PRUSSIAN_BLUE: Rgb = Rgb::new(16, 35, 92);
    pub const TERPS_RED: Rgb = Rgb::new(224, 58, 62);
    pub const TERPS_GOLD: Rgb = Rgb::new(255, 212, 59);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Rgb {
        Rgb { r, g, b }
    }

    /// Scales `color` by a glyph coverage value (0 = transparent, 255 = solid) over `background`.
    #[inline]
    pub fn from_monochrome(coverage: u8, color: Rgb, background: Rgb) -> Rgb {
        let blend = |fg: u8, bg: u8| -> u8 {
            let a = coverage as u16;
            ((fg as u16 * a + bg as u16 * (255 - a) + 127) / 255) as u8
        };
        Rgb {
            r: blend(color.r, background.r),
            g: blend(color.g, background.g),
            b: blend(color.b, background.b),
        }
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Rgb { r, g, b }
    }
}

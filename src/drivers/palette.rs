/// 8-bit RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);
impl Rgb {
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}
/// Curve colors, in assignment order.
pub const PALETTE: [Rgb; 6] = [
    Rgb(0xff, 0xff, 0x00), // yellow
    Rgb(0x00, 0xff, 0xff), // cyan
    Rgb(0xff, 0x00, 0xff), // magenta
    Rgb(0x00, 0xff, 0x00), // green
    Rgb(0xff, 0x00, 0x00), // red
    Rgb(0xff, 0xff, 0xff), // white
];
pub fn channel_color(id: usize) -> Rgb {
    PALETTE[id % PALETTE.len()]
}

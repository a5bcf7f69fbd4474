//! Colors and the roadmap palette
//!
//! The palette is a fixed table of hue families, each a ramp of shades from
//! darkest to lightest. Epics take the middle shade of their family, nested
//! projects walk away from the middle, and backgrounds use the lightest shade.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of hue families in the palette
pub const FAMILIES: usize = 10;

/// Number of shades in every family
pub const SHADES: usize = 20;

/// Color given to milestones no project lends a color to
pub const NEUTRAL: Rgb = rgb("#a9a9a9");

#[derive(Debug, Error, PartialEq)]
pub enum ColorError {
    #[error("Invalid hex color length: {0}")]
    InvalidLength(usize),

    #[error("Invalid first character of hex color: expected '#', got '{0}'")]
    InvalidPrefix(char),

    #[error("Invalid hex digit in color: '{0}'")]
    InvalidDigit(char),
}

/// An opaque RGB color, written as `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Parses `#rgb` or `#rrggbb`, case-insensitive
impl FromStr for Rgb {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let len = s.chars().count();
        if len != 4 && len != 7 {
            return Err(ColorError::InvalidLength(len));
        }

        let mut chars = s.chars();
        match chars.next() {
            Some('#') => {}
            Some(c) => return Err(ColorError::InvalidPrefix(c)),
            None => return Err(ColorError::InvalidLength(0)),
        }

        let digits = chars
            .map(|c| c.to_digit(16).map(|d| d as u8).ok_or(ColorError::InvalidDigit(c)))
            .collect::<Result<Vec<u8>, _>>()?;

        let channel = |hi: u8, lo: u8| hi * 16 + lo;

        Ok(match digits.as_slice() {
            [r, g, b] => Self::new(channel(*r, *r), channel(*g, *g), channel(*b, *b)),
            [r1, r2, g1, g2, b1, b2] => Self::new(channel(*r1, *r2), channel(*g1, *g2), channel(*b1, *b2)),
            _ => return Err(ColorError::InvalidLength(len)),
        })
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

const fn hex_digit(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        b'A'..=b'F' => b - b'A' + 10,
        _ => panic!("invalid hex digit in color constant"),
    }
}

/// Parses a hardcoded `#rrggbb` color at compile time
const fn rgb(hex: &str) -> Rgb {
    let b = hex.as_bytes();
    if b.len() != 7 || b[0] != b'#' {
        panic!("invalid color constant");
    }

    Rgb::new(
        hex_digit(b[1]) * 16 + hex_digit(b[2]),
        hex_digit(b[3]) * 16 + hex_digit(b[4]),
        hex_digit(b[5]) * 16 + hex_digit(b[6]),
    )
}

/// Hue families, darkest shade first
static PALETTE: [[Rgb; SHADES]; FAMILIES] = [
    // Vivid cerulean
    [
        rgb("#001016"), rgb("#001f2c"), rgb("#002e41"), rgb("#003d57"), rgb("#004c6c"),
        rgb("#005b82"), rgb("#006a97"), rgb("#0079ad"), rgb("#0088c2"), rgb("#0097d8"),
        rgb("#00a6ed"), rgb("#17aeee"), rgb("#2eb6f0"), rgb("#45bef1"), rgb("#5cc6f3"),
        rgb("#73cef5"), rgb("#8bd6f6"), rgb("#a2def8"), rgb("#b9e6fa"), rgb("#d0eefb"),
    ],
    // Vivid raspberry
    [
        rgb("#18000b"), rgb("#2f0015"), rgb("#460020"), rgb("#5d002a"), rgb("#740034"),
        rgb("#8c003f"), rgb("#a30049"), rgb("#ba0053"), rgb("#d1005e"), rgb("#e80068"),
        rgb("#ff0072"), rgb("#ff177e"), rgb("#ff2e8b"), rgb("#ff4598"), rgb("#ff5ca5"),
        rgb("#ff73b2"), rgb("#ff8bbe"), rgb("#ffa2cb"), rgb("#ffb9d8"), rgb("#ffd0e5"),
    ],
    // Fluorescent orange
    [
        rgb("#181200"), rgb("#2f2300"), rgb("#463500"), rgb("#5d4600"), rgb("#745700"),
        rgb("#8c6900"), rgb("#a37a00"), rgb("#ba8b00"), rgb("#d19d00"), rgb("#e8ae00"),
        rgb("#ffbf00"), rgb("#ffc417"), rgb("#ffca2e"), rgb("#ffd045"), rgb("#ffd65c"),
        rgb("#ffdc73"), rgb("#ffe18b"), rgb("#ffe7a2"), rgb("#ffedb9"), rgb("#fff3d0"),
    ],
    // Caribbean green
    [
        rgb("#01140f"), rgb("#02271e"), rgb("#023b2c"), rgb("#034e3b"), rgb("#036249"),
        rgb("#047558"), rgb("#048966"), rgb("#059c75"), rgb("#05b083"), rgb("#06c392"),
        rgb("#06d6a0"), rgb("#1cd9a8"), rgb("#33ddb1"), rgb("#49e1b9"), rgb("#60e4c2"),
        rgb("#77e8cb"), rgb("#8decd3"), rgb("#a4f0dc"), rgb("#bbf3e5"), rgb("#d1f7ed"),
    ],
    // Electric purple
    [
        rgb("#120017"), rgb("#24002e"), rgb("#350045"), rgb("#47005c"), rgb("#590073"),
        rgb("#6a0089"), rgb("#7c00a0"), rgb("#8e00b7"), rgb("#9f00ce"), rgb("#b100e5"),
        rgb("#c200fb"), rgb("#c717fb"), rgb("#cd2efb"), rgb("#d245fc"), rgb("#d85cfc"),
        rgb("#dd73fc"), rgb("#e38bfd"), rgb("#e8a2fd"), rgb("#eeb9fd"), rgb("#f3d0fe"),
    ],
    // Orioles orange
    [
        rgb("#170803"), rgb("#2d0f06"), rgb("#441708"), rgb("#5a1e0b"), rgb("#70250e"),
        rgb("#872d10"), rgb("#9d3413"), rgb("#b33b16"), rgb("#ca4318"), rgb("#e04a1b"),
        rgb("#f6511d"), rgb("#f66031"), rgb("#f77046"), rgb("#f8805a"), rgb("#f9906f"),
        rgb("#faa083"), rgb("#faaf98"), rgb("#fbbfac"), rgb("#fccfc1"), rgb("#fddfd5"),
    ],
    // Prussian blue
    [
        rgb("#020408"), rgb("#030810"), rgb("#040c17"), rgb("#05101f"), rgb("#061427"),
        rgb("#08182e"), rgb("#091d36"), rgb("#0a213e"), rgb("#0b2545"), rgb("#0c284d"),
        rgb("#0d2c54"), rgb("#233f63"), rgb("#395273"), rgb("#4f6582"), rgb("#657892"),
        rgb("#7b8ba1"), rgb("#919fb1"), rgb("#a7b2c0"), rgb("#bdc5d0"), rgb("#d3d8df"),
    ],
    // UCLA gold
    [
        rgb("#181100"), rgb("#2f2100"), rgb("#463200"), rgb("#5d4200"), rgb("#745200"),
        rgb("#8c6300"), rgb("#a37300"), rgb("#ba8300"), rgb("#d19400"), rgb("#e8a400"),
        rgb("#ffb400"), rgb("#ffba17"), rgb("#ffc12e"), rgb("#ffc845"), rgb("#ffcf5c"),
        rgb("#ffd673"), rgb("#ffdc8b"), rgb("#ffe3a2"), rgb("#ffeab9"), rgb("#fff1d0"),
    ],
    // Apple green
    [
        rgb("#0c1100"), rgb("#182200"), rgb("#233300"), rgb("#2f4300"), rgb("#3a5400"),
        rgb("#466500"), rgb("#517600"), rgb("#5d8600"), rgb("#689700"), rgb("#74a800"),
        rgb("#7fb800"), rgb("#8abe17"), rgb("#96c42e"), rgb("#a1cb45"), rgb("#add15c"),
        rgb("#b9d873"), rgb("#c4de8b"), rgb("#d0e5a2"), rgb("#dcebb9"), rgb("#e7f2d0"),
    ],
    // Eerie black
    [
        rgb("#030303"), rgb("#050505"), rgb("#070707"), rgb("#090909"), rgb("#0b0b0b"),
        rgb("#0d0d0d"), rgb("#0f0f0f"), rgb("#111111"), rgb("#131313"), rgb("#151515"),
        rgb("#171717"), rgb("#2c2c2c"), rgb("#414141"), rgb("#565656"), rgb("#6b6b6b"),
        rgb("#808080"), rgb("#959595"), rgb("#aaaaaa"), rgb("#bfbfbf"), rgb("#d4d4d4"),
    ],
];

/// Picks the color of a project from its position in the roadmap
///
/// `epic` selects the hue family, `task` counts projects within the current
/// epic and `indentation` is the nesting depth of the project.
pub fn pick_foreground(epic: usize, task: usize, indentation: u8) -> Rgb {
    let family = &PALETTE[epic % FAMILIES];
    let middle = (SHADES / 2) as i64;

    if indentation == 0 {
        return family[middle as usize];
    }

    let shade = middle - task as i64 * 2 - (i64::from(indentation) - 1) * 5;

    family[shade.rem_euclid(SHADES as i64) as usize]
}

/// Picks the background color of an epic
pub fn pick_background(epic: usize) -> Rgb {
    PALETTE[epic % FAMILIES][SHADES - 1]
}

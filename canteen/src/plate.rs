//! Plate types and the per-region plate tally.

use std::fmt;

/// One of the three courses flowing through the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlateType {
    Soup,
    Main,
    Dessert,
}

impl PlateType {
    /// Fixed rotation order used for cook slot assignment.
    pub const ALL: [PlateType; 3] = [PlateType::Soup, PlateType::Main, PlateType::Dessert];

    /// Parses one input symbol: `P` soup, `C` main course, `D` dessert.
    pub fn from_symbol(symbol: u8) -> Option<Self> {
        match symbol {
            b'P' => Some(PlateType::Soup),
            b'C' => Some(PlateType::Main),
            b'D' => Some(PlateType::Dessert),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            PlateType::Soup => 'P',
            PlateType::Main => 'C',
            PlateType::Dessert => 'D',
        }
    }

    /// Type assigned to the `slot`-th claimed production slot (1-based).
    pub fn for_slot(slot: u64) -> Self {
        Self::ALL[((slot.saturating_sub(1)) % 3) as usize]
    }

    pub fn name(self) -> &'static str {
        match self {
            PlateType::Soup => "soup",
            PlateType::Main => "main course",
            PlateType::Dessert => "dessert",
        }
    }
}

impl fmt::Display for PlateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Plate counts held by one region.
///
/// Counts are signed so that a racy claim (see `ClaimMode::Unlocked`) shows up
/// as a negative value instead of wrapping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tray {
    pub soup: i64,
    pub main: i64,
    pub dessert: i64,
}

impl Tray {
    pub fn new(soup: i64, main: i64, dessert: i64) -> Self {
        Self { soup, main, dessert }
    }

    pub fn get(&self, plate: PlateType) -> i64 {
        match plate {
            PlateType::Soup => self.soup,
            PlateType::Main => self.main,
            PlateType::Dessert => self.dessert,
        }
    }

    fn slot_mut(&mut self, plate: PlateType) -> &mut i64 {
        match plate {
            PlateType::Soup => &mut self.soup,
            PlateType::Main => &mut self.main,
            PlateType::Dessert => &mut self.dessert,
        }
    }

    pub fn add(&mut self, plate: PlateType) {
        *self.slot_mut(plate) += 1;
    }

    pub fn remove(&mut self, plate: PlateType) {
        *self.slot_mut(plate) -= 1;
    }

    pub fn total(&self) -> i64 {
        self.soup + self.main + self.dessert
    }

    /// A complete meal needs one plate of every type.
    pub fn has_meal(&self) -> bool {
        self.soup > 0 && self.main > 0 && self.dessert > 0
    }

    pub fn min(&self) -> i64 {
        self.soup.min(self.main).min(self.dessert)
    }

    pub fn is_empty(&self) -> bool {
        self.soup == 0 && self.main == 0 && self.dessert == 0
    }

    pub fn any_negative(&self) -> bool {
        self.soup < 0 || self.main < 0 || self.dessert < 0
    }
}

impl fmt::Display for Tray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "P:{},C:{},D:{}={}",
            self.soup,
            self.main,
            self.dessert,
            self.total()
        )
    }
}

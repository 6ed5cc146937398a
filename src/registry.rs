//! Visual encoding of qualifications: badge colours, icons and quadrant
//! positions for technical qualifications, rank order for leading roles.

use crate::person::{Person, Qualification};
use crate::surface::Color;

/// Corner of the qualifications square a badge occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Quadrant {
    pub fn is_top(&self) -> bool {
        matches!(self, Quadrant::TopLeft | Quadrant::TopRight)
    }

    pub fn is_right(&self) -> bool {
        matches!(self, Quadrant::TopRight | Quadrant::BottomRight)
    }
}

/// A technical qualification shown on the badge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Badge {
    pub qualification: Qualification,
    pub quadrant: Quadrant,
    pub color: Color,
    /// File name under `icons/`.
    pub icon: &'static str,
}

pub const BADGES: [Badge; 4] = [
    Badge {
        qualification: Qualification::Th,
        quadrant: Quadrant::TopLeft,
        color: Color::YELLOW,
        icon: "th.png",
    },
    Badge {
        qualification: Qualification::Maschinist,
        quadrant: Quadrant::TopRight,
        color: Color::DODGER_BLUE,
        icon: "fire_engine.png",
    },
    Badge {
        qualification: Qualification::Kettensaege,
        quadrant: Quadrant::BottomLeft,
        color: Color::GREEN,
        icon: "chainsaw.png",
    },
    Badge {
        qualification: Qualification::Agt,
        quadrant: Quadrant::BottomRight,
        color: Color::RED,
        icon: "agt.png",
    },
];

/// Short codes printed on the leading-role bars, indexed by rank like
/// [`Qualification::LEADING`].
pub const LEADING_CODES: [&str; Qualification::LEADING.len()] = ["TM", "TF", "GF", "ZF", "VF"];

/// Index into [`Qualification::LEADING`] of the highest role held.
pub fn highest_leading_rank(person: &Person) -> Option<usize> {
    Qualification::LEADING
        .iter()
        .enumerate()
        .filter(|(_, role)| person.has(**role))
        .map(|(rank, _)| rank)
        .max()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::person::Function;

    #[test]
    fn highest_rank_ignores_gaps() {
        let person = Person::new("Anna", "Müller", Function::Mannschaft)
            .with_qualification(Qualification::Truppfuehrer)
            .with_qualification(Qualification::Gruppenfuehrer);
        let rank = highest_leading_rank(&person);
        assert_eq!(rank, Some(2));
        assert_eq!(rank.map(|r| Qualification::LEADING[r]), Some(Qualification::Gruppenfuehrer));
    }

    #[test]
    fn no_leading_role_means_trainee() {
        let person = Person::new("Anna", "Müller", Function::Mannschaft).with_qualification(Qualification::Agt);
        assert_eq!(highest_leading_rank(&person), None);
    }

    #[test]
    fn codes_follow_leading_rank() {
        let rank = Qualification::LEADING
            .iter()
            .position(|role| *role == Qualification::Zugfuehrer)
            .unwrap();
        assert_eq!(LEADING_CODES[rank], "ZF");
        assert_eq!(LEADING_CODES[0], "TM");
        assert_eq!(LEADING_CODES[LEADING_CODES.len() - 1], "VF");
    }

    #[test]
    fn badges_cover_each_quadrant_once() {
        for quadrant in [Quadrant::TopLeft, Quadrant::TopRight, Quadrant::BottomLeft, Quadrant::BottomRight] {
            assert_eq!(BADGES.iter().filter(|b| b.quadrant == quadrant).count(), 1);
        }
        assert!(BADGES.iter().all(|b| !b.qualification.is_leading()));
    }
}

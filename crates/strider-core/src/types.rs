use serde::{Deserialize, Serialize};

use crate::error::GaitError;

// ---------------------------------------------------------------------------
// Legs
// ---------------------------------------------------------------------------

/// Number of legs on the robot. Everything in this workspace is quadruped-only.
pub const LEG_COUNT: usize = 4;

/// Per-leg contact flags in canonical leg order (`true` = stance).
pub type ContactState = [bool; LEG_COUNT];

/// Contact state with every foot on the ground.
pub const FULL_STANCE: ContactState = [true; LEG_COUNT];

/// Canonical leg ordering: front-left, front-right, rear-left, rear-right.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Leg {
    FL,
    FR,
    RL,
    RR,
}

/// Order in which legs are updated within one simulated step.
///
/// The diagonal veto reads the partially updated state of the current step,
/// so a leg earlier in this order can start swinging and block its partner
/// in the same step. Changing the order changes which schedules are legal.
pub const LEG_PROCESSING_ORDER: [Leg; LEG_COUNT] = [Leg::FL, Leg::FR, Leg::RL, Leg::RR];

impl Leg {
    pub const ALL: [Self; LEG_COUNT] = [Self::FL, Self::FR, Self::RL, Self::RR];

    /// Index into per-leg arrays.
    pub const fn index(self) -> usize {
        match self {
            Self::FL => 0,
            Self::FR => 1,
            Self::RL => 2,
            Self::RR => 3,
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::FL),
            1 => Some(Self::FR),
            2 => Some(Self::RL),
            3 => Some(Self::RR),
            _ => None,
        }
    }

    /// Diagonally opposite leg: (FL, RR) and (FR, RL).
    pub const fn diagonal(self) -> Self {
        match self {
            Self::FL => Self::RR,
            Self::FR => Self::RL,
            Self::RL => Self::FR,
            Self::RR => Self::FL,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::FL => "FL",
            Self::FR => "FR",
            Self::RL => "RL",
            Self::RR => "RR",
        }
    }
}

/// Contact phase of a single leg.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LegState {
    /// Foot on the ground, bearing load.
    #[default]
    Stance,
    /// Foot in the air, repositioning.
    Swing,
}

impl LegState {
    pub const fn is_stance(self) -> bool {
        matches!(self, Self::Stance)
    }

    pub const fn is_swing(self) -> bool {
        matches!(self, Self::Swing)
    }

    pub const fn from_contact(contact: bool) -> Self {
        if contact { Self::Stance } else { Self::Swing }
    }
}

/// Convert a caller-supplied contact slice into a fixed-size state.
///
/// Rejects anything that is not exactly one flag per leg.
pub fn contacts_from_slice(contacts: &[bool]) -> Result<ContactState, GaitError> {
    <ContactState>::try_from(contacts).map_err(|_| GaitError::ShapeMismatch {
        expected: LEG_COUNT,
        got: contacts.len(),
    })
}

// ---------------------------------------------------------------------------
// GaitType
// ---------------------------------------------------------------------------

/// Periodic gait patterns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GaitType {
    /// All feet on ground (static balance).
    FullStance,
    /// Diagonal pairs alternate: FL+RR and FR+RL.
    #[default]
    Trot,
    /// Lateral pairs alternate: FL+RL and FR+RR.
    Pace,
    /// Front pair and rear pair alternate.
    Bound,
    /// One foot lifts at a time, in sequence.
    Crawl,
}

impl GaitType {
    /// Phase offset of each leg within the gait cycle, in [`Leg::ALL`] order.
    pub const fn phase_offsets(self) -> [f64; LEG_COUNT] {
        match self {
            Self::FullStance => [0.0; LEG_COUNT],
            Self::Trot => [0.0, 0.5, 0.5, 0.0],
            Self::Pace => [0.0, 0.5, 0.0, 0.5],
            Self::Bound => [0.0, 0.0, 0.5, 0.5],
            Self::Crawl => [0.0, 0.5, 0.25, 0.75],
        }
    }
}

// ---------------------------------------------------------------------------
// ContactSequence
// ---------------------------------------------------------------------------

/// Binary contact plan over a horizon: one row per leg, one column per step.
///
/// Entry `(leg, t)` is `true` when the leg is in stance at step `t`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ContactSequence {
    legs: [Vec<bool>; LEG_COUNT],
}

impl ContactSequence {
    /// Sequence with every leg in stance for `horizon` steps.
    pub fn full_stance(horizon: usize) -> Self {
        Self {
            legs: std::array::from_fn(|_| vec![true; horizon]),
        }
    }

    /// Build from per-leg rows of equal length.
    pub fn from_rows(rows: [Vec<bool>; LEG_COUNT]) -> Result<Self, GaitError> {
        let horizon = rows[0].len();
        if let Some(bad) = rows.iter().find(|row| row.len() != horizon) {
            return Err(GaitError::ShapeMismatch {
                expected: horizon,
                got: bad.len(),
            });
        }
        Ok(Self { legs: rows })
    }

    /// Build from a dynamically sized leg-major matrix.
    pub fn from_matrix(rows: Vec<Vec<bool>>) -> Result<Self, GaitError> {
        let got = rows.len();
        let rows: [Vec<bool>; LEG_COUNT] = rows.try_into().map_err(|_| GaitError::ShapeMismatch {
            expected: LEG_COUNT,
            got,
        })?;
        Self::from_rows(rows)
    }

    /// Build from step-major `contacts[step][foot]` as used by MPC solvers.
    pub fn from_steps(steps: &[Vec<bool>]) -> Result<Self, GaitError> {
        let mut legs: [Vec<bool>; LEG_COUNT] =
            std::array::from_fn(|_| Vec::with_capacity(steps.len()));
        for step in steps {
            let column = contacts_from_slice(step)?;
            for (row, contact) in legs.iter_mut().zip(column) {
                row.push(contact);
            }
        }
        Ok(Self { legs })
    }

    /// Step-major view: `contacts[step][foot]`.
    pub fn to_steps(&self) -> Vec<Vec<bool>> {
        (0..self.horizon()).map(|t| self.column(t).to_vec()).collect()
    }

    /// Number of steps covered.
    pub fn horizon(&self) -> usize {
        self.legs[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.horizon() == 0
    }

    /// Contact flags of all legs at step `t`.
    pub fn column(&self, t: usize) -> ContactState {
        std::array::from_fn(|leg| self.legs[leg][t])
    }

    /// First column, if the horizon is non-empty.
    pub fn first(&self) -> Option<ContactState> {
        (!self.is_empty()).then(|| self.column(0))
    }

    /// Timeline of a single leg.
    pub fn leg(&self, leg: Leg) -> &[bool] {
        &self.legs[leg.index()]
    }

    pub fn get(&self, leg: Leg, t: usize) -> bool {
        self.legs[leg.index()][t]
    }

    /// Number of legs in stance at step `t`.
    pub fn stance_count(&self, t: usize) -> usize {
        self.legs.iter().filter(|row| row[t]).count()
    }

    /// Number of legs whose contact flag differs between steps `t - 1` and `t`.
    pub fn transitions(&self, t: usize) -> usize {
        self.legs.iter().filter(|row| row[t] != row[t - 1]).count()
    }

    /// Fraction of steps each leg spends in stance.
    pub fn duty_factors(&self) -> [f64; LEG_COUNT] {
        let horizon = self.horizon();
        std::array::from_fn(|leg| {
            if horizon == 0 {
                return 1.0;
            }
            self.legs[leg].iter().filter(|&&c| c).count() as f64 / horizon as f64
        })
    }

    /// Iterate over columns in time order.
    pub fn columns(&self) -> impl Iterator<Item = ContactState> + '_ {
        (0..self.horizon()).map(|t| self.column(t))
    }
}

impl std::fmt::Display for ContactSequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for leg in Leg::ALL {
            write!(f, "{}: ", leg.label())?;
            for &contact in self.leg(leg) {
                f.write_str(if contact { "1" } else { "0" })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagonal_pairs_follow_index_arithmetic() {
        for leg in Leg::ALL {
            assert_eq!(leg.diagonal().index(), 3 - leg.index());
            assert_eq!(leg.diagonal().diagonal(), leg);
        }
    }

    #[test]
    fn processing_order_is_canonical() {
        let indices: Vec<usize> = LEG_PROCESSING_ORDER.iter().map(|l| l.index()).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn leg_from_index_roundtrip() {
        for leg in Leg::ALL {
            assert_eq!(Leg::from_index(leg.index()), Some(leg));
        }
        assert_eq!(Leg::from_index(4), None);
    }

    #[test]
    fn contacts_from_slice_rejects_wrong_length() {
        assert_eq!(
            contacts_from_slice(&[true, false, true, true]),
            Ok([true, false, true, true])
        );
        assert_eq!(
            contacts_from_slice(&[true, false, true]),
            Err(GaitError::ShapeMismatch { expected: 4, got: 3 })
        );
    }

    #[test]
    fn from_matrix_requires_four_rows() {
        let err = ContactSequence::from_matrix(vec![vec![true; 3]; 5]).unwrap_err();
        assert_eq!(err, GaitError::ShapeMismatch { expected: 4, got: 5 });
    }

    #[test]
    fn from_rows_rejects_ragged() {
        let rows = [vec![true; 3], vec![true; 3], vec![true; 2], vec![true; 3]];
        assert!(matches!(
            ContactSequence::from_rows(rows),
            Err(GaitError::ShapeMismatch { expected: 3, got: 2 })
        ));
    }

    #[test]
    fn step_major_conversion() {
        let steps = vec![
            vec![true, false, false, true],
            vec![true, true, true, true],
        ];
        let seq = ContactSequence::from_steps(&steps).unwrap();
        assert_eq!(seq.horizon(), 2);
        assert_eq!(seq.leg(Leg::FR), &[false, true]);
        assert_eq!(seq.to_steps(), steps);
    }

    #[test]
    fn stance_count_and_transitions() {
        let seq = ContactSequence::from_rows([
            vec![true, false, false],
            vec![true, true, false],
            vec![true, true, true],
            vec![false, true, true],
        ])
        .unwrap();
        assert_eq!(seq.stance_count(0), 3);
        assert_eq!(seq.stance_count(2), 2);
        assert_eq!(seq.transitions(1), 2); // FL 1->0, RR 0->1
        assert_eq!(seq.transitions(2), 1); // FR 1->0
        assert_eq!(seq.first(), Some([true, true, true, false]));
    }

    #[test]
    fn duty_factors_of_full_stance() {
        let seq = ContactSequence::full_stance(8);
        assert_eq!(seq.duty_factors(), [1.0; 4]);
        assert!(seq.columns().all(|c| c == FULL_STANCE));
    }

    #[test]
    fn display_renders_rows() {
        let seq = ContactSequence::from_rows([
            vec![true, false],
            vec![true, true],
            vec![true, true],
            vec![false, true],
        ])
        .unwrap();
        assert_eq!(seq.to_string(), "FL: 10\nFR: 11\nRL: 11\nRR: 01\n");
    }

    #[test]
    fn gait_type_serde_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            gait: GaitType,
        }
        let w: Wrapper = toml::from_str("gait = \"full_stance\"").unwrap();
        assert_eq!(w.gait, GaitType::FullStance);
    }
}

//! Vehicle state records
//!
//! Plain fixed-shape records, one per vehicle archetype. Heading fields are
//! private and every setter wraps the value into (-PI, PI], so a heading can
//! never be observed outside its canonical range.

use std::fmt;

use crate::common::normalize_angle;

/// (x, y, theta) of a first-order car
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarState {
    pub x: f64,
    pub y: f64,
    theta: f64,
}

impl CarState {
    pub fn new(x: f64, y: f64, theta: f64) -> Self {
        Self {
            x,
            y,
            theta: normalize_angle(theta),
        }
    }

    pub fn theta(&self) -> f64 {
        self.theta
    }

    pub fn set_theta(&mut self, theta: f64) {
        self.theta = normalize_angle(theta);
    }
}

/// (x, y, theta, v, w) of a second-order car
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SecondOrderCarState {
    pub x: f64,
    pub y: f64,
    theta: f64,
    /// Linear velocity
    pub v: f64,
    /// Angular velocity
    pub w: f64,
}

impl SecondOrderCarState {
    pub fn new(x: f64, y: f64, theta: f64, v: f64, w: f64) -> Self {
        Self {
            x,
            y,
            theta: normalize_angle(theta),
            v,
            w,
        }
    }

    pub fn theta(&self) -> f64 {
        self.theta
    }

    pub fn set_theta(&mut self, theta: f64) {
        self.theta = normalize_angle(theta);
    }
}

/// Tractor position plus one heading per body: index 0 is the tractor,
/// index i >= 1 the i-th trailer.
#[derive(Debug, Clone, PartialEq)]
pub struct TrailerState {
    pub x: f64,
    pub y: f64,
    theta: Vec<f64>,
}

impl TrailerState {
    /// `headings` holds the tractor heading followed by the trailer headings.
    ///
    /// # Panics
    /// If `headings` is empty.
    pub fn new(x: f64, y: f64, headings: &[f64]) -> Self {
        assert!(
            !headings.is_empty(),
            "trailer state needs at least the tractor heading"
        );
        Self {
            x,
            y,
            theta: headings.iter().map(|&t| normalize_angle(t)).collect(),
        }
    }

    /// All bodies aligned with heading 0 at the origin
    pub fn zeroed(num_trailers: usize) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            theta: vec![0.0; num_trailers + 1],
        }
    }

    pub fn num_trailers(&self) -> usize {
        self.theta.len() - 1
    }

    /// Heading of body `body` (0 = tractor)
    pub fn theta(&self, body: usize) -> f64 {
        self.theta[body]
    }

    pub fn set_theta(&mut self, body: usize, theta: f64) {
        self.theta[body] = normalize_angle(theta);
    }

    pub fn headings(&self) -> &[f64] {
        &self.theta
    }

    /// Overwrite with `other`, reusing the heading buffer.
    pub fn copy_from(&mut self, other: &TrailerState) {
        self.x = other.x;
        self.y = other.y;
        self.theta.clear();
        self.theta.extend_from_slice(&other.theta);
    }
}

/// Discriminant of [`VehicleState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateKind {
    FirstOrderCar,
    SecondOrderCar,
    CarWithTrailers,
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StateKind::FirstOrderCar => "first-order car",
            StateKind::SecondOrderCar => "second-order car",
            StateKind::CarWithTrailers => "car with trailers",
        };
        f.write_str(name)
    }
}

/// State of any supported vehicle
#[derive(Debug, Clone, PartialEq)]
pub enum VehicleState {
    FirstOrderCar(CarState),
    SecondOrderCar(SecondOrderCarState),
    CarWithTrailers(TrailerState),
}

impl VehicleState {
    pub fn kind(&self) -> StateKind {
        match self {
            VehicleState::FirstOrderCar(_) => StateKind::FirstOrderCar,
            VehicleState::SecondOrderCar(_) => StateKind::SecondOrderCar,
            VehicleState::CarWithTrailers(_) => StateKind::CarWithTrailers,
        }
    }

    pub fn x(&self) -> f64 {
        match self {
            VehicleState::FirstOrderCar(s) => s.x,
            VehicleState::SecondOrderCar(s) => s.x,
            VehicleState::CarWithTrailers(s) => s.x,
        }
    }

    pub fn y(&self) -> f64 {
        match self {
            VehicleState::FirstOrderCar(s) => s.y,
            VehicleState::SecondOrderCar(s) => s.y,
            VehicleState::CarWithTrailers(s) => s.y,
        }
    }

    /// Heading of the leading body
    pub fn yaw(&self) -> f64 {
        match self {
            VehicleState::FirstOrderCar(s) => s.theta(),
            VehicleState::SecondOrderCar(s) => s.theta(),
            VehicleState::CarWithTrailers(s) => s.theta(0),
        }
    }

    /// Overwrite (x, y) and leave every other field untouched
    pub fn set_position(&mut self, x: f64, y: f64) {
        match self {
            VehicleState::FirstOrderCar(s) => {
                s.x = x;
                s.y = y;
            }
            VehicleState::SecondOrderCar(s) => {
                s.x = x;
                s.y = y;
            }
            VehicleState::CarWithTrailers(s) => {
                s.x = x;
                s.y = y;
            }
        }
    }

    pub fn as_first_order_car(&self) -> Option<&CarState> {
        match self {
            VehicleState::FirstOrderCar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_second_order_car(&self) -> Option<&SecondOrderCarState> {
        match self {
            VehicleState::SecondOrderCar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_car_with_trailers(&self) -> Option<&TrailerState> {
        match self {
            VehicleState::CarWithTrailers(s) => Some(s),
            _ => None,
        }
    }
}

impl From<CarState> for VehicleState {
    fn from(s: CarState) -> Self {
        VehicleState::FirstOrderCar(s)
    }
}

impl From<SecondOrderCarState> for VehicleState {
    fn from(s: SecondOrderCarState) -> Self {
        VehicleState::SecondOrderCar(s)
    }
}

impl From<TrailerState> for VehicleState {
    fn from(s: TrailerState) -> Self {
        VehicleState::CarWithTrailers(s)
    }
}

/// Abort on a state of the wrong archetype
pub(crate) fn state_mismatch(expected: StateKind, found: &VehicleState) -> ! {
    panic!(
        "state kind mismatch: robot expects a {} state, got a {} state",
        expected,
        found.kind()
    )
}

//! A small vehicle model.

use dump::{Dump, DumpError, Dumper, Renderer, dump_unimplemented};

use crate::{Full, Sparse};

/// What an engine runs on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FuelType {
    /// Diesel fuel.
    Diesel,
    /// Petrol.
    Petrol,
    /// Natural gas.
    Gas,
    /// Batteries.
    Electric,
}

impl FuelType {
    /// Lowercase name, as rendered.
    pub fn as_str(self) -> &'static str {
        match self {
            FuelType::Diesel => "diesel",
            FuelType::Petrol => "petrol",
            FuelType::Gas => "gas",
            FuelType::Electric => "electric",
        }
    }
}

/// An engine.
#[derive(Clone, Debug, PartialEq)]
pub struct Engine {
    /// Fuel type.
    pub fuel: FuelType,
    /// Power in kW.
    pub power: f32,
}

/// A tire.
#[derive(Clone, Debug, PartialEq)]
pub struct Tire {
    /// Who made it.
    pub manufacturer: String,
    /// Width in millimeters.
    pub width: u32,
    /// Rim size in inches.
    pub size: f32,
}

/// A car with four tires.
#[derive(Clone, Debug, PartialEq)]
pub struct Car {
    /// Who made it.
    pub manufacturer: String,
    /// Model name.
    pub model: String,
    /// Year of manufacture.
    pub year: u16,
    /// The engine.
    pub engine: Engine,
    /// Front left, front right, rear left, rear right.
    pub tires: [Tire; 4],
}

impl Car {
    /// The car used throughout the demo and the tests.
    pub fn sample() -> Self {
        let tire = Tire {
            manufacturer: "Tire Brand".to_owned(),
            width: 215,
            size: 16.0,
        };
        Car {
            manufacturer: "Car Brand".to_owned(),
            model: "Model 2000".to_owned(),
            year: 2002,
            engine: Engine {
                fuel: FuelType::Electric,
                power: 69.0,
            },
            tires: [tire.clone(), tire.clone(), tire.clone(), tire],
        }
    }
}

impl<A: ?Sized> Dump<A> for FuelType {
    fn dump<R: Renderer>(&self, d: &mut Dumper<'_, A, R>) -> Result<(), DumpError> {
        d.enum_tag(self.as_str())
    }
}

impl Dump<Full> for Car {
    fn dump<R: Renderer>(&self, d: &mut Dumper<'_, Full, R>) -> Result<(), DumpError> {
        d.node(self, "Car")?;
        d.attr(self, "manufacturer", &self.manufacturer, false, true)?;
        d.attr(self, "model", &self.model, false, true)?;
        d.attr(self, "year", &self.year, false, true)?;
        d.attr(self, "engine", &self.engine, false, false)?;
        d.attr(self, "tires", &self.tires, true, false)
    }
}

impl Dump<Full> for Engine {
    fn dump<R: Renderer>(&self, d: &mut Dumper<'_, Full, R>) -> Result<(), DumpError> {
        d.node(self, "Engine")?;
        d.attr(self, "fuel", &self.fuel, false, true)?;
        d.attr(self, "power", &self.power, true, true)
    }
}

impl Dump<Full> for Tire {
    fn dump<R: Renderer>(&self, d: &mut Dumper<'_, Full, R>) -> Result<(), DumpError> {
        d.node(self, "Tire")?;
        d.attr(self, "manufacturer", &self.manufacturer, false, true)?;
        d.attr(self, "width", &self.width, false, true)?;
        d.attr(self, "size", &self.size, true, true)
    }
}

// Only what matters for a quick comparison of cars.
impl Dump<Sparse> for Car {
    fn dump<R: Renderer>(&self, d: &mut Dumper<'_, Sparse, R>) -> Result<(), DumpError> {
        d.node(self, "Car")?;
        d.attr(self, "model", &self.model, false, true)?;
        d.attr(self, "fuel", &self.engine.fuel, false, true)?;
        d.attr(self, "power", &self.engine.power, true, true)
    }
}

dump_unimplemented!(Sparse => Engine, Tire);

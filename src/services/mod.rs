pub mod capacity;
pub mod finance;
pub mod irradiance;
pub mod roi;
pub mod tariff;
pub mod usage;

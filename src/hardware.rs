pub mod ad9361;
pub mod ina219;

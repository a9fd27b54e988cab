pub mod bladerf2;

pub mod fishing_components;

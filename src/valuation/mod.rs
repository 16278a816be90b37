pub mod valuation_calculator;


pub use valuation_calculator::compute_aum;

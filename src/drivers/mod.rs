//! Input and output drivers plus one-shot hardware initialisation.

pub mod button;
pub mod encoder;
pub mod hw_init;
pub mod lamp_pwm;

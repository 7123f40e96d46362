//! Tool definitions module.
//!
//! This module exports all available tool definitions.
//! Each tool is defined in its own file for better maintainability.

pub mod holiday;
pub mod math;

pub use holiday::{
    GenerateFinalPhotoTool, GenerateHolidaySceneTool, GenerateSweaterPatternTool,
    GenerateWearingSweaterTool,
};
pub use math::{AddTool, MultiplyTool};

//! Array literal output for color tables.
//!
//! Produces text that can be pasted into source code of the viewer:
//!
//! ```text
//! let xxx = [
//!     SIMD4<Float>(0.0, 0.0, 1.0, 1.0),
//!     ...
//! ]
//! ```

use std::io::Write;

use super::gradient::Rgba;
use crate::config::PaletteConfig;
use crate::error::Result;

/// Shape of the emitted array declaration
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayLiteral {
    /// Name of the declared array
    pub name: String,
    /// Constructor wrapped around each color
    pub element: String,
}

impl ArrayLiteral {
    pub fn new(name: &str, element: &str) -> Self {
        Self {
            name: name.to_string(),
            element: element.to_string(),
        }
    }

    /// Write the declaration, one color per line
    pub fn write<W: Write>(&self, out: &mut W, colors: &[Rgba]) -> Result<()> {
        writeln!(out, "let {} = [", self.name)?;
        for c in colors {
            writeln!(
                out,
                "    {}({:?}, {:?}, {:?}, {:?}),",
                self.element, c.r, c.g, c.b, c.a
            )?;
        }
        writeln!(out, "]")?;
        Ok(())
    }

    /// Render the declaration into a string
    pub fn render(&self, colors: &[Rgba]) -> Result<String> {
        let mut buffer = Vec::new();
        self.write(&mut buffer, colors)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

impl From<&PaletteConfig> for ArrayLiteral {
    fn from(config: &PaletteConfig) -> Self {
        Self::new(&config.array_name, &config.element)
    }
}

pub mod report;

use ansi_term::Colour;

use crate::tracker::entities::Status;

/// Decides whether printed text gets terminal colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    colored: bool,
}

impl Palette {
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }

    pub fn plain() -> Self {
        Self { colored: false }
    }

    pub fn paint(&self, colour: Colour, text: &str) -> String {
        if self.colored {
            colour.paint(text).to_string()
        } else {
            text.to_string()
        }
    }

    /// Uppercased status in its color. Unknown values are shown verbatim in magenta.
    pub fn status(&self, status: &Status) -> String {
        let colour = match status {
            Status::Yes => Colour::Green,
            Status::No => Colour::Red,
            Status::None => Colour::White,
            Status::Sick => Colour::Blue,
            Status::Cancel | Status::Break => Colour::Yellow,
            Status::Other(_) => Colour::Purple,
        };
        self.paint(colour, &status.as_str().to_uppercase())
    }
}

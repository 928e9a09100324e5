use std::{fmt::Display, ops::Deref};

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Percentage(f64);

impl Display for Percentage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}%", self.0)
    }
}

impl Percentage {
    /// Share of `part` in `whole`. An empty whole is 0% rather than a division error.
    pub fn of(part: usize, whole: usize) -> Percentage {
        if whole == 0 {
            Percentage(0.)
        } else {
            Percentage(part as f64 / whole as f64 * 100.)
        }
    }
}

impl Deref for Percentage {
    type Target = f64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::Percentage;

    #[test]
    fn test_percentage_of_empty_whole() {
        assert_eq!(*Percentage::of(0, 0), 0.);
        assert_eq!(*Percentage::of(3, 0), 0.);
    }

    #[test]
    fn test_percentage_display() {
        assert_eq!(Percentage::of(1, 3).to_string(), "33.3%");
        assert_eq!(Percentage::of(25, 25).to_string(), "100.0%");
        assert_eq!(Percentage::of(0, 25).to_string(), "0.0%");
    }
}

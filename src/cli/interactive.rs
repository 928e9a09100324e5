use ansi_term::Colour;
use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error};

use crate::tracker::{
    entities::{MonthTarget, Status},
    error::TrackerError,
    store::TrackedStoreAccess,
    RemoveOutcome, Tracker,
};

use super::output::{report::render_report, Palette};

/// Prompt driven session. Every round makes sure the current month exists and then asks for one
/// of `set`, `show`, `remove` or `exit`. Ends on `exit` or when input runs out.
///
/// Errors about user input or missing months are printed and the session continues. Errors that
/// make the store unusable end the session.
pub async fn run_interactive<S, R, W>(
    tracker: &Tracker<S>,
    input: &mut R,
    output: &mut W,
    palette: Palette,
) -> Result<()>
where
    S: TrackedStoreAccess,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut session = Session {
        tracker,
        input,
        output,
        palette,
    };

    loop {
        session.write(&format!("{}\n", "-".repeat(51))).await?;
        tracker.init_current_month().await?;

        let Some(function) = session
            .prompt("Functions: set | show | remove | exit\n--> ")
            .await?
        else {
            return Ok(());
        };

        let result = match function.to_lowercase().as_str() {
            "set" => session.set().await,
            "show" => session.show().await,
            "remove" => session.remove().await,
            "exit" => match session.confirm("Exit?").await? {
                Some(true) | None => return Ok(()),
                Some(false) => Ok(()),
            },
            "" => Ok(()),
            other => {
                session
                    .write(&format!("Unknown function '{other}'\n"))
                    .await?;
                Ok(())
            }
        };

        match result {
            Ok(()) => {}
            Err(SessionError::Tracker(
                e @ (TrackerError::StoreCorrupt { .. }
                | TrackerError::Io(_)
                | TrackerError::Serialize(_)),
            )) => {
                error!("Stopping interactive session {e:?}");
                return Err(e.into());
            }
            Err(SessionError::Tracker(e)) => {
                debug!("Operation failed {e:?}");
                session
                    .write(&format!("{}\n", palette.paint(Colour::Red, &e.to_string())))
                    .await?;
            }
            Err(SessionError::InputClosed) => return Ok(()),
            Err(SessionError::Other(e)) => return Err(e),
        }
    }
}

enum SessionError {
    Tracker(TrackerError),
    InputClosed,
    Other(anyhow::Error),
}

impl From<TrackerError> for SessionError {
    fn from(value: TrackerError) -> Self {
        SessionError::Tracker(value)
    }
}

impl From<anyhow::Error> for SessionError {
    fn from(value: anyhow::Error) -> Self {
        SessionError::Other(value)
    }
}

struct Session<'a, S: TrackedStoreAccess, R, W> {
    tracker: &'a Tracker<S>,
    input: &'a mut R,
    output: &'a mut W,
    palette: Palette,
}

impl<S, R, W> Session<'_, S, R, W>
where
    S: TrackedStoreAccess,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    async fn write(&mut self, text: &str) -> Result<()> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.flush().await?;
        Ok(())
    }

    /// Returns [None] when the input is closed.
    async fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        self.write(text).await?;
        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    async fn confirm(&mut self, question: &str) -> Result<Option<bool>> {
        let text = format!(
            "{question} ({}/{}) -> ",
            self.palette.paint(Colour::Green, "y"),
            self.palette.paint(Colour::Red, "n")
        );
        Ok(self
            .prompt(&text)
            .await?
            .map(|answer| answer.eq_ignore_ascii_case("y")))
    }

    async fn month_target(&mut self) -> Result<MonthTarget, SessionError> {
        let text = format!(
            "Date format: '{}.{}' or '{}' » {}\n->> ",
            self.palette.paint(Colour::Red, "MM"),
            self.palette.paint(Colour::Red, "YYYY"),
            self.palette.paint(Colour::Blue, "t"),
            self.palette.paint(Colour::Blue, "today"),
        );
        let answer = self.prompt(&text).await?.ok_or(SessionError::InputClosed)?;
        Ok(answer.parse::<MonthTarget>()?)
    }

    async fn set(&mut self) -> Result<(), SessionError> {
        let tracker = self.tracker;
        let month = self.month_target().await?.resolve(tracker.today());

        let values = tracker
            .config()
            .allowed_values
            .iter()
            .map(|v| self.palette.status(v))
            .collect::<Vec<_>>();
        let text = format!("Values: {}\n->> ", values.join(" | "));
        let value = self.prompt(&text).await?.ok_or(SessionError::InputClosed)?;

        tracker
            .set_day(month, None, Status::from(value))
            .await?;
        Ok(())
    }

    async fn show(&mut self) -> Result<(), SessionError> {
        let tracker = self.tracker;
        let month = self.month_target().await?.resolve(tracker.today());
        let report = tracker.month_report(month, None).await?;
        self.write(&render_report(&report, self.palette)).await?;
        Ok(())
    }

    async fn remove(&mut self) -> Result<(), SessionError> {
        let tracker = self.tracker;
        let month = self.month_target().await?.resolve(tracker.today());

        match self.confirm("Are you sure?").await? {
            Some(true) => {}
            Some(false) => return Ok(()),
            None => return Err(SessionError::InputClosed),
        }

        if tracker.remove_month(month).await? == RemoveOutcome::NotFound {
            self.write(&format!("⚠️ {month} not found.\n")).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{path::Path, sync::LazyLock};

    use anyhow::Result;
    use chrono::NaiveDate;
    use tempfile::tempdir;
    use tokio::io::BufReader;

    use crate::{
        cli::output::Palette,
        tracker::{
            config::{Preset, TrackerConfig},
            entities::{MonthKey, Status},
            store::{JsonFileStore, TrackedStoreAccess},
            Tracker,
        },
        utils::{clock::MockClock, logging::TEST_LOGGING},
    };

    use super::run_interactive;

    fn tracker(dir: &Path) -> Tracker<JsonFileStore> {
        LazyLock::force(&TEST_LOGGING);
        let mut clock = MockClock::new();
        clock
            .expect_today()
            .return_const(NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
        let config = TrackerConfig::from_preset(Preset::Extended, dir);
        let store = JsonFileStore::new(config.store_path.clone());
        Tracker::new(store, config, Box::new(clock))
    }

    async fn run(tracker: &Tracker<JsonFileStore>, script: &str) -> Result<String> {
        let mut input = BufReader::new(script.as_bytes());
        let mut output = Vec::<u8>::new();
        run_interactive(tracker, &mut input, &mut output, Palette::plain()).await?;
        Ok(String::from_utf8(output)?)
    }

    #[tokio::test]
    async fn test_session_creates_month_and_sets_value() -> Result<()> {
        let dir = tempdir()?;
        let tracker = tracker(dir.path());

        let output = run(&tracker, "set\nt\nYES\nshow\n6.2024\nexit\ny\n").await?;

        let june = tracker.get_month(MonthKey::new(6, 2024)?).await?;
        assert_eq!(june.get(3), Some(&Status::Yes));
        let written = std::fs::read_to_string(&tracker.config().store_path)?;
        assert!(written.contains("\"3\": \"yes\""));
        assert!(output.contains("Values: NO | YES | SICK | CANCEL | BREAK"));
        assert!(output.contains("• 3     | YES"));
        Ok(())
    }

    #[tokio::test]
    async fn test_session_reports_errors_and_continues() -> Result<()> {
        let dir = tempdir()?;
        let tracker = tracker(dir.path());

        let output = run(&tracker, "set\nt\nmaybe\nshow\n1.2020\nshow\nnonsense\nfly\n").await?;

        assert!(output.contains("value 'maybe' is not allowed"));
        assert!(output.contains("month 1.2020 is not initialized yet"));
        assert!(output.contains("'nonsense' is not a month key"));
        assert!(output.contains("Unknown function 'fly'"));
        Ok(())
    }

    #[tokio::test]
    async fn test_remove_requires_confirmation() -> Result<()> {
        let dir = tempdir()?;
        let tracker = tracker(dir.path());
        let june = MonthKey::new(6, 2024)?;

        run(&tracker, "set\nt\nyes\nremove\nt\nn\n").await?;
        assert_eq!(tracker.get_month(june).await?.get(3), Some(&Status::Yes));

        let output = run(&tracker, "remove\n3.2011\ny\n").await?;
        assert!(output.contains("3.2011 not found."));

        // Every round starts by creating the current month, so a removed June comes back empty.
        run(&tracker, "remove\nt\ny\n").await?;
        assert_eq!(tracker.get_month(june).await?.get(3), Some(&Status::None));

        let store = JsonFileStore::new(tracker.config().store_path.clone());
        assert_eq!(store.load().await?.len(), 1);
        Ok(())
    }
}

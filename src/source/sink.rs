//! Result sinks.

use std::io::Write;
use std::sync::{Mutex, RwLock};

use crate::engine::Forecast;

use super::traits::{ResultSink, SourceError};

fn lock_err(context: &'static str) -> SourceError {
    SourceError::Backend(format!("poisoned lock: {context}"))
}

/// Collects every accepted forecast in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    forecasts: RwLock<Vec<Forecast>>,
}

impl MemorySink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of forecasts received so far.
    pub fn len(&self) -> Result<usize, SourceError> {
        let guard = self.forecasts.read().map_err(|_| lock_err("memory_sink.len"))?;
        Ok(guard.len())
    }

    /// Returns true if nothing has been received.
    pub fn is_empty(&self) -> Result<bool, SourceError> {
        Ok(self.len()? == 0)
    }

    /// Removes and returns everything received so far.
    pub fn drain(&self) -> Result<Vec<Forecast>, SourceError> {
        let mut guard = self.forecasts.write().map_err(|_| lock_err("memory_sink.drain"))?;
        Ok(std::mem::take(&mut *guard))
    }
}

impl ResultSink for MemorySink {
    fn accept(&self, forecast: &Forecast) -> Result<(), SourceError> {
        let mut guard = self.forecasts.write().map_err(|_| lock_err("memory_sink.accept"))?;
        guard.push(forecast.clone());
        Ok(())
    }
}

/// Writes each forecast as one line of JSON.
pub struct JsonLinesSink<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesSink<W> {
    /// Wrap a writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Unwrap the writer.
    pub fn into_inner(self) -> Result<W, SourceError> {
        self.writer.into_inner().map_err(|_| lock_err("json_lines_sink.into_inner"))
    }
}

impl<W: Write + Send> ResultSink for JsonLinesSink<W> {
    fn accept(&self, forecast: &Forecast) -> Result<(), SourceError> {
        let line = serde_json::to_string(forecast)
            .map_err(|e| SourceError::Serialization(e.to_string()))?;
        let mut writer = self.writer.lock().map_err(|_| lock_err("json_lines_sink.accept"))?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::reference;
    use crate::scenario::Scenario;

    fn sample_forecast() -> Forecast {
        let engine = reference::engine().unwrap();
        engine
            .run(&Scenario::new().with_shock(9, -15.0), 2026, 2)
            .unwrap()
    }

    #[test]
    fn memory_sink_collects_and_drains() {
        let sink = MemorySink::new();
        assert!(sink.is_empty().unwrap());

        let forecast = sample_forecast();
        sink.accept(&forecast).unwrap();
        sink.accept(&forecast).unwrap();
        assert_eq!(sink.len().unwrap(), 2);

        let drained = sink.drain().unwrap();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].ledger(), forecast.ledger());
        assert!(sink.is_empty().unwrap());
    }

    #[test]
    fn json_lines_sink_writes_one_line_per_forecast() {
        let sink = JsonLinesSink::new(Vec::new());
        let forecast = sample_forecast();
        sink.accept(&forecast).unwrap();
        sink.accept(&forecast).unwrap();

        let bytes = sink.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(value["start_year"], 2026);
        assert_eq!(value["horizon"], 2);
        assert!(value["ledger"].is_object());
    }
}

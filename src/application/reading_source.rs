// Reading source trait for sensor data access
use crate::domain::reading::Reading;
use async_trait::async_trait;

#[async_trait]
pub trait ReadingSource: Send + Sync {
    /// Take one snapshot of every pollutant. Called once per tick.
    async fn next_reading(&self) -> anyhow::Result<Reading>;
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays scripted readings; an `Err` entry or an exhausted script fails.
    pub struct ScriptedSource {
        script: Mutex<VecDeque<Result<Reading, String>>>,
    }

    impl ScriptedSource {
        pub fn new(script: impl IntoIterator<Item = Result<Reading, String>>) -> Self {
            Self {
                script: Mutex::new(script.into_iter().collect()),
            }
        }

        pub fn readings(readings: impl IntoIterator<Item = Reading>) -> Self {
            Self::new(readings.into_iter().map(Ok))
        }
    }

    #[async_trait]
    impl ReadingSource for ScriptedSource {
        async fn next_reading(&self) -> anyhow::Result<Reading> {
            let next = self.script.lock().unwrap().pop_front();
            match next {
                Some(Ok(reading)) => Ok(reading),
                Some(Err(message)) => Err(anyhow::anyhow!(message)),
                None => anyhow::bail!("script exhausted"),
            }
        }
    }

    /// Always returns the same reading.
    pub struct ConstantSource(pub Reading);

    #[async_trait]
    impl ReadingSource for ConstantSource {
        async fn next_reading(&self) -> anyhow::Result<Reading> {
            Ok(self.0)
        }
    }
}

//! Line prompts for interactive commands. One `Prompter` owns the input for the
//! whole command, so piped answers survive across prompts.

use anyhow::{bail, Context, Result};
use secrecy::SecretString;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

/// Prompter over the process stdin, asking on stderr.
pub type StdioPrompter = Prompter<BufReader<io::Stdin>, io::Stderr>;

#[derive(Debug)]
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl StdioPrompter {
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stderr())
    }
}

impl<R, W> Prompter<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Reads one line after writing `label`.
    ///
    /// # Errors
    /// Fails when the input is closed before a line arrives.
    pub async fn line(&mut self, label: &str) -> Result<String> {
        self.output.write_all(label.as_bytes()).await?;
        self.output.flush().await?;

        let mut answer = String::new();
        let read = self
            .input
            .read_line(&mut answer)
            .await
            .context("failed to read from stdin")?;
        if read == 0 {
            bail!("stdin closed while waiting for input");
        }
        Ok(answer.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Same as [`Prompter::line`] but keeps the answer in a `SecretString`.
    ///
    /// # Errors
    /// See [`Prompter::line`].
    pub async fn secret(&mut self, label: &str) -> Result<SecretString> {
        self.line(label).await.map(SecretString::from)
    }

    /// Uses `value` when present, otherwise prompts.
    ///
    /// # Errors
    /// See [`Prompter::line`].
    pub async fn or_line(&mut self, value: Option<String>, label: &str) -> Result<String> {
        match value {
            Some(value) => Ok(value),
            None => self.line(label).await,
        }
    }

    /// # Errors
    /// See [`Prompter::line`].
    pub async fn or_secret(
        &mut self,
        value: Option<SecretString>,
        label: &str,
    ) -> Result<SecretString> {
        match value {
            Some(value) => Ok(value),
            None => self.secret(label).await,
        }
    }

    #[cfg(test)]
    pub(crate) fn output(&self) -> &W {
        &self.output
    }
}

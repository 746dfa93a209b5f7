use crate::application::service::Quote;
use crate::domain::account::UserId;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QuoteLine<'a> {
    request: usize,
    user: UserId,
    #[serde(flatten)]
    quote: &'a Quote,
}

/// Writes quotes as JSON Lines, one object per quote.
pub struct JsonQuoteWriter<W: Write> {
    sink: W,
}

impl<W: Write> JsonQuoteWriter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    pub fn write_quote(&mut self, request: usize, user: UserId, quote: &Quote) -> Result<()> {
        serde_json::to_writer(&mut self.sink, &QuoteLine {
            request,
            user,
            quote,
        })?;
        self.sink.write_all(b"\n")?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush()?;
        Ok(())
    }
}

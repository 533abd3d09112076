use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use chrono::NaiveDate;
use futures::channel::oneshot;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::presentation::chart::nearest_point;
use crate::timeseries::PortfolioPoint;

/// How a date selection ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionStatus {
    /// The sink called [`SelectionAck::done`].
    Acknowledged,
    /// The sink dropped its ack without calling `done`.
    Abandoned,
    /// No sink was attached; nothing to wait for.
    Unobserved,
}

/// Completion token handed to the sink with every selected date.
#[derive(Debug)]
pub struct SelectionAck {
    tx: oneshot::Sender<()>,
}

impl SelectionAck {
    /// Signal that the presentation layer has finished reacting.
    pub fn done(self) {
        // receiver gone means nobody is waiting any more
        let _ = self.tx.send(());
    }
}

/// Receives the date the user picked on the chart.
pub trait DateSelectionSink {
    fn date_selected(&self, date: NaiveDate, ack: SelectionAck);
}

impl<F> DateSelectionSink for F
where
    F: Fn(NaiveDate, SelectionAck),
{
    fn date_selected(&self, date: NaiveDate, ack: SelectionAck) {
        self(date, ack)
    }
}

/// Future returned by [`select_date`]; resolves once the sink acknowledges
/// or abandons the selection.
#[derive(Debug)]
pub struct SelectionHandle {
    date: NaiveDate,
    rx: Option<oneshot::Receiver<()>>,
    settled: Option<SelectionStatus>,
}

impl SelectionHandle {
    /// The series date that was selected.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Non-blocking check; `None` while the sink is still working.
    pub fn try_status(&mut self) -> Option<SelectionStatus> {
        if self.settled.is_none() {
            self.settled = match self.rx.as_mut() {
                None => Some(SelectionStatus::Unobserved),
                Some(rx) => match rx.try_recv() {
                    Ok(Some(())) => Some(SelectionStatus::Acknowledged),
                    Ok(None) => None,
                    Err(oneshot::Canceled) => Some(SelectionStatus::Abandoned),
                },
            };
        }
        self.settled
    }
}

impl Future for SelectionHandle {
    type Output = SelectionStatus;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if let Some(status) = this.settled {
            return Poll::Ready(status);
        }
        let Some(rx) = this.rx.as_mut() else {
            return Poll::Ready(SelectionStatus::Unobserved);
        };
        let status = match Pin::new(rx).poll(cx) {
            Poll::Ready(Ok(())) => SelectionStatus::Acknowledged,
            Poll::Ready(Err(oneshot::Canceled)) => SelectionStatus::Abandoned,
            Poll::Pending => return Poll::Pending,
        };
        this.settled = Some(status);
        Poll::Ready(status)
    }
}

/// Snap `target` to the nearest series point and notify the sink.
///
/// Returns immediately; the sink's work is tracked by the returned handle.
/// `None` when the series is empty.
pub fn select_date(
    series: &[PortfolioPoint],
    target: NaiveDate,
    sink: Option<&dyn DateSelectionSink>,
) -> Option<SelectionHandle> {
    let date = nearest_point(series, target)?.date;
    let Some(sink) = sink else {
        return Some(SelectionHandle {
            date,
            rx: None,
            settled: Some(SelectionStatus::Unobserved),
        });
    };

    let (tx, rx) = oneshot::channel();
    debug!(%target, %date, "date selected");
    sink.date_selected(date, SelectionAck { tx });
    Some(SelectionHandle {
        date,
        rx: Some(rx),
        settled: None,
    })
}

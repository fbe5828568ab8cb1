use crate::image::ImageDescriptor;
use crate::record::ResultRecord;

/// Supplies the image set for a survey.
///
/// An empty list is valid and leads to immediate completion on start.
/// Errors fail controller initialization; they are surfaced once and do
/// not poison anything beyond the ability to start.
pub trait ImageSource {
    fn image_list(&mut self) -> anyhow::Result<Vec<ImageDescriptor>>;
}

/// Accepts completed-trial records for persistence.
///
/// Implementations should return quickly; sinks that talk to disk or the
/// network are expected to hand the record off to a background worker.
/// The controller logs and swallows submission errors, so a failing sink
/// never stalls a survey.
pub trait ResultSink {
    fn submit(&mut self, record: ResultRecord) -> anyhow::Result<()>;
}

impl<T: ImageSource + ?Sized> ImageSource for Box<T> {
    fn image_list(&mut self) -> anyhow::Result<Vec<ImageDescriptor>> {
        (**self).image_list()
    }
}

impl<T: ResultSink + ?Sized> ResultSink for Box<T> {
    fn submit(&mut self, record: ResultRecord) -> anyhow::Result<()> {
        (**self).submit(record)
    }
}

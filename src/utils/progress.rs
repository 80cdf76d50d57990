//! Thin progress reporting that compiles to nothing without the
//! `progress` feature.

/// A progress bar handle; all methods are no-ops when the feature is off
pub struct Progress {
    #[cfg(feature = "progress")]
    bar: Option<indicatif::ProgressBar>,
}

impl Progress {
    /// A bar with a known length
    #[cfg(feature = "progress")]
    pub fn bar(len: u64, message: &'static str) -> Self {
        let bar = indicatif::ProgressBar::new(len);
        if let Ok(style) =
            indicatif::ProgressStyle::default_bar().template("{msg} [{bar:30}] {pos}/{len}")
        {
            bar.set_style(style);
        }
        bar.set_message(message);
        Self { bar: Some(bar) }
    }

    #[cfg(not(feature = "progress"))]
    pub fn bar(_len: u64, _message: &'static str) -> Self {
        Self {}
    }

    pub fn tick(&self) {
        #[cfg(feature = "progress")]
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    pub fn finish(&self) {
        #[cfg(feature = "progress")]
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

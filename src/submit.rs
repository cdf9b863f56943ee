//*** START FILE: src/submit.rs ***//
use crate::color::table::ColorTable;
use crate::config::Config;
use crate::counter::{CounterState, ImageIdAllocator};
use crate::error::Result;
use crate::form::FormData;
use crate::generator::builder::ConfiguratorJsonGenerator;
use crate::generator::document::ConfiguratorDocument;
use crate::generator::uid::UidSource;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReport {
    pub output_file: PathBuf,
    pub first_image_id: Option<u64>,
    pub last_image_id: Option<u64>,
    pub image_count: usize,
    /// `last_record` as persisted after this submission.
    pub counter_value: u64,
}

/// State loaded once at startup and shared by every submission.
#[derive(Debug, Clone)]
pub struct Session {
    pub config: Config,
    pub colors: ColorTable,
    /// Why the color table is empty, if loading it failed.
    pub color_error: Option<String>,
    counter: CounterState,
}

impl Session {
    /// A missing or broken color table is tolerated (empty table); a broken counter is not.
    pub fn open(config: Config) -> Result<Self> {
        let (colors, color_error) = match ColorTable::load(&config.color_table) {
            Ok(colors) => (colors, None),
            Err(e) => {
                tracing::error!("{}", e);
                (ColorTable::new(), Some(e.to_string()))
            }
        };
        let counter = CounterState::load(&config.counter_file)?;
        tracing::info!(
            "Session ready: {} colors, last image id {}",
            colors.len(),
            counter.last_record
        );

        Ok(Self {
            config,
            colors,
            color_error,
            counter,
        })
    }

    pub fn last_record(&self) -> u64 {
        self.counter.last_record
    }

    /// Validates `form`, writes the configurator JSON to `output`, then persists the counter.
    ///
    /// The counter is only advanced once the document is on disk.
    pub fn submit<U: UidSource>(
        &mut self,
        form: &FormData,
        output: &Path,
        uids: U,
    ) -> Result<(ConfiguratorDocument, SubmitReport)> {
        form.validate()?;

        let mut ids = ImageIdAllocator::from_state(self.counter, self.config.first_image_id);
        let first_image_id = ids.peek();
        let document = ConfiguratorJsonGenerator::new(form, &self.colors, &self.config.base_url, uids)
            .generate(&mut ids)?;

        document.save_to_file(output)?;

        let highest = ids.highest_allocated();
        let counter_value = match highest {
            Some(highest) => CounterState::save_at_least(&self.config.counter_file, highest)?,
            None => self.counter.last_record,
        };
        self.counter.last_record = counter_value;

        let report = SubmitReport {
            output_file: output.to_path_buf(),
            first_image_id: highest.and(first_image_id),
            last_image_id: highest,
            image_count: document.settings.editor_images.len(),
            counter_value,
        };
        tracing::info!(
            "Form submitted: '{}' with {} sections, images {:?}..={:?}",
            document.title,
            form.sections.len(),
            report.first_image_id,
            report.last_image_id
        );
        Ok((document, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::form::FormError;
    use crate::generator::uid::SequentialUids;
    use std::fs;

    fn config_in(dir: &Path) -> Config {
        Config {
            color_table: dir.join("colors.csv"),
            counter_file: dir.join("last_record.json"),
            output_file: dir.join("configurator.json"),
            log_file: dir.join("configurator.log"),
            ..Config::default()
        }
    }

    #[test]
    fn missing_color_table_is_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::open(config_in(dir.path())).unwrap();
        assert!(session.colors.is_empty());
        assert!(session.color_error.is_some());
        assert_eq!(session.last_record(), 0);
    }

    #[test]
    fn invalid_form_leaves_files_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let output = config.output_file.clone();
        let mut session = Session::open(config).unwrap();

        let err = session
            .submit(&FormData::default(), &output, SequentialUids::default())
            .unwrap_err();
        assert!(matches!(err, Error::Form(FormError::Invalid(_))));
        assert!(!output.exists());
        assert!(!dir.path().join("last_record.json").exists());
    }

    #[test]
    fn consecutive_submissions_continue_the_counter() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("colors.csv"), "Couleur;RGBA\nA;rgba(1,1,1,1)\nB;rgba(2,2,2,1)\n").unwrap();
        let config = config_in(dir.path());
        let output = config.output_file.clone();
        let mut session = Session::open(config).unwrap();
        let form = FormData::template();

        let (_, first) = session.submit(&form, &output, SequentialUids::default()).unwrap();
        assert_eq!(first.first_image_id, Some(100_000));
        assert_eq!(first.last_image_id, Some(100_002));
        assert_eq!(first.counter_value, 100_002);

        let (_, second) = session.submit(&form, &output, SequentialUids::default()).unwrap();
        assert_eq!(second.first_image_id, Some(100_003));
        assert_eq!(second.counter_value, 100_005);
        assert_eq!(
            CounterState::load(&dir.path().join("last_record.json")).unwrap().last_record,
            100_005
        );
    }
}
//*** END FILE: src/submit.rs ***//

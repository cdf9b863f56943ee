use super::document::{
    Actions, Component, ConfiguratorDocument, ControlType, DocumentSettings, EditorImage,
    EditorImages, NodeKind, NodeSettings, Views, DATA_VERSION, DOCUMENT_TYPE,
};
use super::uid::UidSource;
use crate::color::table::ColorTable;
use crate::counter::{CounterError, ImageIdAllocator};
use crate::form::{FormData, SectionRecord};
use crate::url_builder;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

const MAX_UID_ATTEMPTS: usize = 1_000;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("section {index}: cannot build an image URL (motif, date or product type missing)")]
    IncompleteSection { index: usize },
    #[error("section {index}: width and height must be positive integers")]
    InvalidDimensions { index: usize },
    #[error("uid source kept returning duplicates")]
    UidExhausted,
    #[error("Failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize configurator: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Counter(#[from] CounterError),
}

/// Builds the configurator document from a submitted form.
///
/// Image ids are drawn from the allocator in document order: the group layer
/// image first, then every section's color variants in color-table order.
pub struct ConfiguratorJsonGenerator<'a, U: UidSource> {
    form: &'a FormData,
    colors: &'a ColorTable,
    base_url: &'a str,
    uids: U,
    issued: HashSet<String>,
    editor_images: EditorImages,
}

impl<'a, U: UidSource> ConfiguratorJsonGenerator<'a, U> {
    pub fn new(form: &'a FormData, colors: &'a ColorTable, base_url: &'a str, uids: U) -> Self {
        Self {
            form,
            colors,
            base_url,
            uids,
            issued: HashSet::new(),
            editor_images: EditorImages::default(),
        }
    }

    fn generate_uid(&mut self) -> Result<String, GeneratorError> {
        for _ in 0..MAX_UID_ATTEMPTS {
            let uid = self.uids.next_uid();
            if self.issued.insert(uid.clone()) {
                return Ok(uid);
            }
        }
        Err(GeneratorError::UidExhausted)
    }

    fn build_group_layer(&mut self, ids: &mut ImageIdAllocator) -> Result<Component, GeneratorError> {
        let form = self.form;
        let group_layer = &form.group_layer;
        let group_layer_uid = self.generate_uid()?;
        let child_uid = self.generate_uid()?;
        let image_id = ids.allocate()?;

        self.editor_images.insert(
            image_id,
            EditorImage {
                uid: child_uid.clone(),
                key: "image",
                src: group_layer.image_url.trim().to_string(),
                width: group_layer.width,
                height: group_layer.height,
            },
        );

        Ok(Component {
            name: "Group Layer 1".to_string(),
            uid: group_layer_uid,
            kind: NodeKind::Group,
            actions: Actions {
                open: true,
                show: true,
                lock: Some(false),
            },
            children: Some(vec![Component {
                name: "Image 1".to_string(),
                uid: child_uid,
                kind: NodeKind::Image,
                actions: Actions {
                    open: false,
                    show: true,
                    lock: Some(false),
                },
                children: None,
                settings: NodeSettings::IconImage {
                    control_type: ControlType::Icon,
                    active: true,
                    views: Views::front(image_id),
                },
            }]),
            settings: NodeSettings::GroupLayer {
                control_type: ControlType::Icon,
                required: group_layer.required,
                hide_control: group_layer.hide_control,
            },
        })
    }

    fn build_section(
        &mut self,
        number: usize,
        section: &SectionRecord,
        ids: &mut ImageIdAllocator,
    ) -> Result<Component, GeneratorError> {
        let (width, height) = section
            .dimensions()
            .ok_or(GeneratorError::InvalidDimensions { index: number })?;
        if url_builder::product_base_url(self.base_url, section).is_none() {
            return Err(GeneratorError::IncompleteSection { index: number });
        }

        let section_uid = self.generate_uid()?;
        let mut children = Vec::with_capacity(self.colors.len());

        let colors = self.colors;
        for (idx, color) in colors.entries().iter().enumerate() {
            let child_uid = self.generate_uid()?;
            let image_id = ids.allocate()?;
            let src = url_builder::image_src(self.base_url, section, &color.name, image_id)
                .ok_or(GeneratorError::IncompleteSection { index: number })?;

            self.editor_images.insert(
                image_id,
                EditorImage {
                    uid: child_uid.clone(),
                    key: "image",
                    src,
                    width,
                    height,
                },
            );

            children.push(Component {
                name: format!("Image {}", idx + 1),
                uid: child_uid,
                kind: NodeKind::Image,
                actions: Actions {
                    open: false,
                    show: false,
                    lock: None,
                },
                children: None,
                settings: NodeSettings::ColorImage {
                    control_type: ControlType::Color,
                    views: Views::front(image_id),
                    color: color.rgba.clone(),
                },
            });
        }

        Ok(Component {
            name: format!("Section {}", number),
            uid: section_uid,
            kind: NodeKind::Group,
            actions: Actions {
                open: true,
                show: true,
                lock: None,
            },
            children: Some(children),
            settings: NodeSettings::Section {
                custom_class: format!("productGroup group{}", number),
                control_type: ControlType::Icon,
            },
        })
    }

    pub fn generate(mut self, ids: &mut ImageIdAllocator) -> Result<ConfiguratorDocument, GeneratorError> {
        if self.colors.is_empty() && !self.form.sections.is_empty() {
            tracing::warn!("Color table is empty, sections will have no image variants");
        }

        let mut components = vec![self.build_group_layer(ids)?];
        let form = self.form;
        for (i, section) in form.sections.iter().enumerate() {
            components.push(self.build_section(i + 1, section, ids)?);
        }
        tracing::info!(
            "Built {} components with {} editor images",
            components.len(),
            self.editor_images.len()
        );

        Ok(ConfiguratorDocument {
            title: form.name.trim().to_string(),
            kind: DOCUMENT_TYPE,
            settings: DocumentSettings {
                data_version: DATA_VERSION,
                config_style: form.style.slug().to_string(),
                form: form.form.slug().to_string(),
                base_price: form.base_price.trim().to_string(),
                custom_css: form.custom_css.clone(),
                custom_js: form.custom_js.clone(),
                components,
                editor_images: self.editor_images,
            },
        })
    }
}

impl ConfiguratorDocument {
    pub fn to_pretty_json(&self) -> Result<String, GeneratorError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save_to_file(&self, file_path: &Path) -> Result<(), GeneratorError> {
        let io_err = |source: std::io::Error| GeneratorError::Io {
            path: file_path.to_path_buf(),
            source,
        };
        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let file = File::create(file_path).map_err(io_err)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n").map_err(io_err)?;
        writer.flush().map_err(io_err)?;
        tracing::info!("JSON saved to {}", file_path.display());
        Ok(())
    }
}

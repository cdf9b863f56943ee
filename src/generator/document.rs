//*** START FILE: src/generator/document.rs ***//
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

pub const DOCUMENT_TYPE: &str = "amz_configurator";
pub const DATA_VERSION: &str = "3.4";

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Group,
    Image,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ControlType {
    Icon,
    Color,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Actions {
    pub open: bool,
    pub show: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lock: Option<bool>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct FrontView {
    pub image: u64,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Views {
    pub front: FrontView,
}

impl Views {
    pub fn front(image: u64) -> Self {
        Self {
            front: FrontView { image },
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum NodeSettings {
    GroupLayer {
        control_type: ControlType,
        required: bool,
        hide_control: bool,
    },
    Section {
        custom_class: String,
        control_type: ControlType,
    },
    IconImage {
        control_type: ControlType,
        active: bool,
        views: Views,
    },
    ColorImage {
        control_type: ControlType,
        views: Views,
        color: String,
    },
}

impl NodeSettings {
    /// Image id shown by this node, if it is an image node.
    pub fn image_id(&self) -> Option<u64> {
        match self {
            NodeSettings::IconImage { views, .. } | NodeSettings::ColorImage { views, .. } => {
                Some(views.front.image)
            }
            _ => None,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub name: String,
    pub uid: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub actions: Actions,
    /// `None` for image leaves; group nodes always carry a list, possibly empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Component>>,
    pub settings: NodeSettings,
}

impl Component {
    pub fn children(&self) -> &[Component] {
        self.children.as_deref().unwrap_or_default()
    }

    /// This node and all descendants, depth first.
    pub fn walk(&self) -> Vec<&Component> {
        let mut out = vec![self];
        for child in self.children() {
            out.extend(child.walk());
        }
        out
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct EditorImage {
    pub uid: String,
    pub key: &'static str,
    pub src: String,
    pub width: u32,
    pub height: u32,
}

/// `image_id → EditorImage`, serialized as a JSON object in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorImages {
    entries: Vec<(u64, EditorImage)>,
}

impl EditorImages {
    pub fn insert(&mut self, image_id: u64, image: EditorImage) {
        match self.entries.iter_mut().find(|(id, _)| *id == image_id) {
            Some((_, existing)) => *existing = image,
            None => self.entries.push((image_id, image)),
        }
    }

    pub fn get(&self, image_id: u64) -> Option<&EditorImage> {
        self.entries
            .iter()
            .find(|(id, _)| *id == image_id)
            .map(|(_, image)| image)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.entries.iter().map(|(id, _)| *id)
    }
}

impl Serialize for EditorImages {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, image) in &self.entries {
            map.serialize_entry(&id.to_string(), image)?;
        }
        map.end()
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct DocumentSettings {
    #[serde(rename = "_wpc_data_version")]
    pub data_version: &'static str,
    #[serde(rename = "_wpc_config_style")]
    pub config_style: String,
    #[serde(rename = "_wpc_form")]
    pub form: String,
    #[serde(rename = "_wpc_base_price")]
    pub base_price: String,
    #[serde(rename = "_wpc_custom_css")]
    pub custom_css: String,
    #[serde(rename = "_wpc_custom_js")]
    pub custom_js: String,
    #[serde(rename = "_wpc_components")]
    pub components: Vec<Component>,
    #[serde(rename = "_wpc_editor_images")]
    pub editor_images: EditorImages,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ConfiguratorDocument {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub settings: DocumentSettings,
}

impl ConfiguratorDocument {
    /// Image ids referenced anywhere in the component tree.
    pub fn referenced_image_ids(&self) -> Vec<u64> {
        self.settings
            .components
            .iter()
            .flat_map(|c| c.walk())
            .filter_map(|node| node.settings.image_id())
            .collect()
    }
}
//*** END FILE: src/generator/document.rs ***//

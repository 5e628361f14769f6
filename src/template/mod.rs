mod markup;
mod predicate;
mod tag;

use crate::classify::MethodRole;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub use markup::{DOC_CLOSE, DOC_OPEN, is_decoration, line_prefix, strip_markup};
pub use predicate::{ParsedTemplate, Predicate, PredicateKind};
pub use tag::{Tag, delete_fragment, strip_directive, substitute};

/// Template used for a role without its own template when
/// [`TemplateOptions::default_for_missing_roles`] is set
pub const DEFAULT_TEMPLATE: &str = "/**\n *\n */";

/// Store key prefix reserved for custom method templates
pub const CUSTOM_PREFIX: &str = "CUSTOM";

/// Name of the configuration file searched for next to the sources
pub const CONFIG_FILE_NAME: &str = ".javadocky.toml";

/// How many parent directories are searched for [`CONFIG_FILE_NAME`]
const MAX_DEPTH: usize = 3;

/// The declaration scopes a template can be configured for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocItem {
    Classes,
    Fields,
    Constructors,
    Methods,
}

impl DocItem {
    pub const ALL: [DocItem; 4] = [
        DocItem::Classes,
        DocItem::Fields,
        DocItem::Constructors,
        DocItem::Methods,
    ];

    /// The store key of the item
    pub const fn key(self) -> &'static str {
        match self {
            DocItem::Classes => "Classes",
            DocItem::Fields => "Fields",
            DocItem::Constructors => "Constructors",
            DocItem::Methods => "Methods",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|item| item.key() == key)
    }
}

/// Templates for the built-in method roles
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoleTemplates {
    pub hash_code: Option<String>,
    pub equals: Option<String>,
    pub clone: Option<String>,
    pub to_string: Option<String>,
    pub getter: Option<String>,
    pub setter: Option<String>,
}

impl RoleTemplates {
    fn slot(&self, role: MethodRole) -> Option<&Option<String>> {
        match role {
            MethodRole::IdentityHash => Some(&self.hash_code),
            MethodRole::IdentityEquals => Some(&self.equals),
            MethodRole::IdentityClone => Some(&self.clone),
            MethodRole::IdentityToString => Some(&self.to_string),
            MethodRole::Accessor => Some(&self.getter),
            MethodRole::Mutator => Some(&self.setter),
            MethodRole::ConstructorLike | MethodRole::Custom => None,
        }
    }

    fn slot_mut(&mut self, role: MethodRole) -> Option<&mut Option<String>> {
        match role {
            MethodRole::IdentityHash => Some(&mut self.hash_code),
            MethodRole::IdentityEquals => Some(&mut self.equals),
            MethodRole::IdentityClone => Some(&mut self.clone),
            MethodRole::IdentityToString => Some(&mut self.to_string),
            MethodRole::Accessor => Some(&mut self.getter),
            MethodRole::Mutator => Some(&mut self.setter),
            MethodRole::ConstructorLike | MethodRole::Custom => None,
        }
    }
}

/// A named template for methods that play no built-in role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomTemplateEntry {
    pub name: String,
    pub template: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TemplateOptions {
    /// Use [`DEFAULT_TEMPLATE`] for roles without a configured template
    pub default_for_missing_roles: bool,
}

/// The full template configuration.
///
/// A scope whose template is absent is disabled. The `methods` entry only acts as the switch
/// for method documentation; the text actually rendered comes from `roles` or `custom`.
///
/// # Examples
///
/// ```
/// use javadocky::{DocItem, Templates};
///
/// let templates = Templates::from_toml_str(r#"
/// fields = "/**\n * <instance>\n */"
///
/// [[custom]]
/// name = "compute"
/// template = "/**\n * <nameContains>\n * Computes <instance>\n */"
/// "#).unwrap();
///
/// assert!(templates.is_enabled(DocItem::Fields));
/// assert!(!templates.is_enabled(DocItem::Classes));
/// assert_eq!(templates.custom_template("compute").map(|t| t.name.as_str()), Some("compute"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Templates {
    pub classes: Option<String>,
    pub fields: Option<String>,
    pub constructors: Option<String>,
    pub methods: Option<String>,
    pub roles: RoleTemplates,
    pub custom: Vec<CustomTemplateEntry>,
    pub options: TemplateOptions,
}

impl Templates {
    /// A ready-made configuration with every scope and role enabled
    pub fn standard() -> Self {
        Self {
            classes: Some("/**\n * The {@code <className>} class\n */".to_string()),
            fields: Some("/**\n * {@code <instance>}\n */".to_string()),
            constructors: Some(
                "/**\n * Constructor to init the {@link <className>} class\n *\n * <params>\n */"
                    .to_string(),
            ),
            methods: Some(DEFAULT_TEMPLATE.to_string()),
            roles: RoleTemplates {
                hash_code: Some("/**\n * Returns a hash code value for the object\n *\n * @return hash code of the object as int\n */".to_string()),
                equals: Some("/**\n * Indicates whether some other object is equal to this one\n *\n * <params>\n * @return whether the objects are equal as boolean\n */".to_string()),
                clone: Some("/**\n * Creates and returns a copy of this object\n *\n * @return a copy as {@link <returnType>}\n */".to_string()),
                to_string: Some("/**\n * Returns a string representation of the object\n *\n * @return a string representation as {@link String}\n */".to_string()),
                getter: Some("/**\n * Method to get {@link #<instance>}\n *\n * @return {@link #<instance>} instance as {@link <returnType>}\n */".to_string()),
                setter: Some("/**\n * Method to set {@link #<instance>}\n *\n * <params>\n */".to_string()),
            },
            custom: Vec::new(),
            options: TemplateOptions::default(),
        }
    }

    /// Parses and validates a TOML configuration.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let templates: Self = toml::from_str(content)?;
        templates.validate()?;
        Ok(templates)
    }

    /// Loads a TOML configuration from `path`.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Searches for [`CONFIG_FILE_NAME`] from `start` upwards, at most three levels.
    ///
    /// Returns the path of the configuration found, if any.
    pub fn discover(start: &Path) -> Option<PathBuf> {
        let mut current_dir = if start.is_file() {
            start.parent()?.to_path_buf()
        } else {
            start.to_path_buf()
        };

        for _ in 0..=MAX_DEPTH {
            let candidate = current_dir.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                debug!("found template configuration at {}", candidate.display());
                return Some(candidate);
            }
            if !current_dir.pop() {
                break;
            }
        }
        None
    }

    /// Serializes the configuration back to TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::InvalidConfig(format!("Failed to serialize templates: {e}")))
    }

    /// Checks that custom template names are non-empty and unique.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for entry in &self.custom {
            if entry.name.trim().is_empty() {
                return Err(Error::InvalidConfig(
                    "custom template with an empty name".to_string(),
                ));
            }
            if !seen.insert(entry.name.as_str()) {
                return Err(Error::InvalidConfig(format!(
                    "duplicate custom template name: {}",
                    entry.name
                )));
            }
        }
        Ok(())
    }

    /// The template of a declaration scope, `None` when the scope is disabled
    pub fn item(&self, item: DocItem) -> Option<&str> {
        match item {
            DocItem::Classes => self.classes.as_deref(),
            DocItem::Fields => self.fields.as_deref(),
            DocItem::Constructors => self.constructors.as_deref(),
            DocItem::Methods => self.methods.as_deref(),
        }
    }

    fn item_mut(&mut self, item: DocItem) -> &mut Option<String> {
        match item {
            DocItem::Classes => &mut self.classes,
            DocItem::Fields => &mut self.fields,
            DocItem::Constructors => &mut self.constructors,
            DocItem::Methods => &mut self.methods,
        }
    }

    pub fn is_enabled(&self, item: DocItem) -> bool {
        self.item(item).is_some()
    }

    /// The template for a built-in method role.
    ///
    /// Constructors use the Constructors template. Custom methods have no single template and
    /// always yield `None` here.
    pub fn role_template(&self, role: MethodRole) -> Option<&str> {
        if role == MethodRole::ConstructorLike {
            return self.constructors.as_deref();
        }
        let slot = self.roles.slot(role)?;
        slot.as_deref().or_else(|| {
            self.options
                .default_for_missing_roles
                .then_some(DEFAULT_TEMPLATE)
        })
    }

    /// Custom templates in the order they were stored
    pub fn custom_templates(&self) -> &[CustomTemplateEntry] {
        &self.custom
    }

    pub fn custom_template(&self, name: &str) -> Option<&CustomTemplateEntry> {
        self.custom.iter().find(|entry| entry.name == name)
    }

    /// Removes the Methods scope together with every role and custom template.
    pub fn remove_all_method_templates(&mut self) {
        self.methods = None;
        self.roles = RoleTemplates::default();
        self.custom.clear();
    }
}

/// String keyed access to templates, with custom templates under [`CUSTOM_PREFIX`].
pub trait TemplateStore {
    fn get(&self, key: &str) -> Option<&str>;

    /// Stores a template, replacing any previous one under the same key
    fn put(&mut self, key: &str, template: String) -> Result<()>;

    /// Removes a template and returns it
    fn remove(&mut self, key: &str) -> Option<String>;

    /// Every key holding a template; custom keys come last, in stored order
    fn keys(&self) -> Vec<String>;
}

/// What a store key refers to
enum StoreKey<'a> {
    Item(DocItem),
    Role(MethodRole),
    Custom(&'a str),
}

impl<'a> StoreKey<'a> {
    fn parse(key: &'a str) -> Option<Self> {
        if let Some(item) = DocItem::from_key(key) {
            return Some(StoreKey::Item(item));
        }
        if let Some(role) = MethodRole::from_store_key(key) {
            return Some(StoreKey::Role(role));
        }
        key.strip_prefix(CUSTOM_PREFIX)
            .filter(|name| !name.is_empty())
            .map(StoreKey::Custom)
    }
}

impl TemplateStore for Templates {
    fn get(&self, key: &str) -> Option<&str> {
        match StoreKey::parse(key)? {
            StoreKey::Item(item) => self.item(item),
            StoreKey::Role(role) => self.roles.slot(role)?.as_deref(),
            StoreKey::Custom(name) => self.custom_template(name).map(|e| e.template.as_str()),
        }
    }

    fn put(&mut self, key: &str, template: String) -> Result<()> {
        match StoreKey::parse(key) {
            Some(StoreKey::Item(item)) => *self.item_mut(item) = Some(template),
            Some(StoreKey::Role(role)) => match self.roles.slot_mut(role) {
                Some(slot) => *slot = Some(template),
                None => return Err(Error::InvalidConfig(format!("unknown template key: {key}"))),
            },
            Some(StoreKey::Custom(name)) => {
                match self.custom.iter_mut().find(|entry| entry.name == name) {
                    Some(entry) => entry.template = template,
                    None => self.custom.push(CustomTemplateEntry {
                        name: name.to_string(),
                        template,
                    }),
                }
            }
            None => return Err(Error::InvalidConfig(format!("unknown template key: {key}"))),
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Option<String> {
        match StoreKey::parse(key)? {
            StoreKey::Item(item) => self.item_mut(item).take(),
            StoreKey::Role(role) => self.roles.slot_mut(role)?.take(),
            StoreKey::Custom(name) => {
                let pos = self.custom.iter().position(|entry| entry.name == name)?;
                Some(self.custom.remove(pos).template)
            }
        }
    }

    fn keys(&self) -> Vec<String> {
        let items = DocItem::ALL
            .into_iter()
            .filter(|item| self.is_enabled(*item))
            .map(|item| item.key().to_string());
        let roles = MethodRole::ALL.into_iter().filter_map(|role| {
            let key = role.store_key()?;
            self.roles.slot(role)?.as_ref().map(|_| key.to_string())
        });
        let custom = self
            .custom
            .iter()
            .map(|entry| format!("{CUSTOM_PREFIX}{}", entry.name));
        items.chain(roles).chain(custom).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_items_disable_scopes() {
        let templates = Templates::default();
        for item in DocItem::ALL {
            assert!(!templates.is_enabled(item));
        }
        assert!(Templates::standard().is_enabled(DocItem::Methods));
    }

    #[test]
    fn test_role_template_fallback() {
        let mut templates = Templates::from_toml_str(
            r#"
methods = ""

[roles]
getter = "/**\n * Gets <instance>\n */"
"#,
        )
        .unwrap();
        assert_eq!(
            templates.role_template(MethodRole::Accessor),
            Some("/**\n * Gets <instance>\n */")
        );
        assert_eq!(templates.role_template(MethodRole::Mutator), None);
        assert_eq!(templates.role_template(MethodRole::Custom), None);

        templates.options.default_for_missing_roles = true;
        assert_eq!(
            templates.role_template(MethodRole::Mutator),
            Some(DEFAULT_TEMPLATE)
        );
        assert_eq!(templates.role_template(MethodRole::Custom), None);
    }

    #[test]
    fn test_duplicate_custom_names_are_rejected() {
        let result = Templates::from_toml_str(
            r#"
[[custom]]
name = "a"
template = "/** one */"

[[custom]]
name = "a"
template = "/** two */"
"#,
        );
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let result = Templates::from_toml_str("klasses = \"/** x */\"");
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_store_keys_and_custom_prefix() {
        let mut templates = Templates::default();
        templates.put("Fields", "/** f */".to_string()).unwrap();
        templates.put("GETTER", "/** g */".to_string()).unwrap();
        templates.put("CUSTOMbuild", "/** b */".to_string()).unwrap();
        templates.put("CUSTOMrun", "/** r */".to_string()).unwrap();
        templates.put("CUSTOMbuild", "/** b2 */".to_string()).unwrap();

        assert_eq!(
            templates.keys(),
            vec!["Fields", "GETTER", "CUSTOMbuild", "CUSTOMrun"]
        );
        assert_eq!(templates.get("CUSTOMbuild"), Some("/** b2 */"));
        assert_eq!(templates.custom_templates()[0].name, "build");
        assert!(templates.put("CUSTOM", "/** x */".to_string()).is_err());
        assert!(templates.put("Bogus", "/** x */".to_string()).is_err());

        assert_eq!(templates.remove("CUSTOMbuild").as_deref(), Some("/** b2 */"));
        assert_eq!(templates.remove("CUSTOMbuild"), None);
        assert_eq!(templates.remove("GETTER").as_deref(), Some("/** g */"));
        assert_eq!(templates.keys(), vec!["Fields", "CUSTOMrun"]);
    }

    #[test]
    fn test_remove_all_method_templates() {
        let mut templates = Templates::standard();
        templates.put("CUSTOMbuild", "/** b */".to_string()).unwrap();
        templates.remove_all_method_templates();

        assert!(!templates.is_enabled(DocItem::Methods));
        assert!(templates.custom_templates().is_empty());
        assert_eq!(templates.roles, RoleTemplates::default());
        assert!(templates.is_enabled(DocItem::Fields));
    }

    #[test]
    fn test_toml_round_trip_of_standard_templates() {
        let templates = Templates::standard();
        let text = templates.to_toml_string().unwrap();
        assert_eq!(Templates::from_toml_str(&text).unwrap(), templates);
    }

    #[test]
    fn test_discover_searches_parent_directories() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("src/main/java");
        fs::create_dir_all(&nested).unwrap();
        assert_eq!(Templates::discover(&nested), None);

        let config = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config, "fields = \"/** <instance> */\"").unwrap();
        assert_eq!(Templates::discover(&nested), Some(config.clone()));

        let templates = Templates::load(&config).unwrap();
        assert_eq!(templates.fields.as_deref(), Some("/** <instance> */"));
    }

    #[test]
    fn test_load_missing_file() {
        let result = Templates::load(Path::new("does/not/exist.toml"));
        assert!(matches!(result, Err(Error::FileNotFound(_))));
    }
}

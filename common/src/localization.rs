//! Message catalog.
//!
//! Every human readable log line goes through a [`Localizer`]. Messages are looked up by
//! a camelCase id and may carry positional placeholders (`{0}`, `{1}`, ...). Callers never
//! inspect the produced text; control flow is driven by [`crate::error::Error`] alone.

use std::fmt::Display;

use crate::config::DEFAULT_LOCALE;

pub trait Localizer {
    /// Looks up `key` and substitutes `args` into its placeholders.
    fn text(&self, key: &str, args: &[&dyn Display]) -> String;
}

pub mod keys {
    pub const JSON_PARSE_SUCCESS: &str = "jsonParseSuccess";
    pub const JSON_PARSE_ERROR: &str = "jsonParseError";
    pub const JSON_NOT_OBJECT: &str = "jsonNotObject";
    pub const JSON_CHECK_PROPERTIES: &str = "jsonCheckProperties";
    pub const JSON_MISSING_PROPS: &str = "jsonMissingProps";
    pub const JSON_INVALID_PROPERTY: &str = "jsonInvalidProperty";
    pub const CREDENTIALS_PARTIAL: &str = "credentialsPartial";

    pub const LOG_GET_SERVICE: &str = "logGetService";
    pub const LOG_SET_SERVICE: &str = "logSetService";
    pub const LOG_DELETE_SERVICE: &str = "logDeleteService";
    pub const LOG_EXPORT_SERVICES: &str = "logExportServices";
    pub const LOG_COMMAND_FAILED: &str = "logCommandFailed";

    pub const SERVICE_GET_RETRIEVING: &str = "serviceGetRetrieving";
    pub const SERVICE_GET_NOT_FOUND: &str = "serviceGetNotFound";
    pub const SERVICE_GET_STATUS_ERROR: &str = "serviceGetStatusError";

    pub const SERVICE_SET_CREATING_WITH_PARAMS: &str = "serviceSetCreatingWithParams";
    pub const SERVICE_SET_CREATED_SUCCESS: &str = "serviceSetCreatedSuccess";
    pub const SERVICE_SET_EXISTS_UPDATING: &str = "serviceSetExistsUpdating";
    pub const SERVICE_SET_UPDATED_SUCCESS: &str = "serviceSetUpdatedSuccess";
    pub const SERVICE_SET_UPDATE_ERROR: &str = "serviceSetUpdateError";
    pub const SERVICE_SET_DESCRIPTION_ERROR: &str = "serviceSetDescriptionError";
    pub const SERVICE_SET_ROLLBACK_ERROR: &str = "serviceSetRollbackError";

    pub const SERVICE_DELETE_STOPPING: &str = "serviceDeleteStopping";
    pub const SERVICE_DELETE_ALREADY_STOPPED: &str = "serviceDeleteAlreadyStopped";
    pub const SERVICE_DELETE_STOP_ERROR: &str = "serviceDeleteStopError";
    pub const SERVICE_DELETE_DELETING: &str = "serviceDeleteDeleting";
    pub const SERVICE_DELETE_DELETED_SUCCESS: &str = "serviceDeleteDeletedSuccess";
    pub const SERVICE_DELETE_ERROR: &str = "serviceDeleteError";

    pub const SERVICE_EXPORT_RETRIEVING: &str = "serviceExportRetrieving";
    pub const SERVICE_EXPORT_DETAIL_ERROR: &str = "serviceExportDetailError";
    pub const SERVICE_EXPORT_ERROR: &str = "serviceExportError";

    pub const WHAT_IF_SERVICE_CREATE: &str = "whatIfServiceCreate";
    pub const WHAT_IF_ACCESS_DENIED: &str = "whatIfAccessDenied";
    pub const WHAT_IF_QUERY_ERROR: &str = "whatIfQueryError";
    pub const WHAT_IF_CHANGES: &str = "whatIfChanges";
    pub const WHAT_IF_NO_CHANGES: &str = "whatIfNoChanges";
    pub const WHAT_IF_SERVICE_DELETE: &str = "whatIfServiceDelete";
    pub const WHAT_IF_SERVICE_MISSING: &str = "whatIfServiceMissing";
}

type Table = &'static [(&'static str, &'static str)];

const EN_US: Table = &[
    (keys::JSON_PARSE_SUCCESS, "Parsed input: {0}"),
    (keys::JSON_PARSE_ERROR, "Input is not valid JSON: {0}"),
    (keys::JSON_NOT_OBJECT, "Input must be a JSON object"),
    (keys::JSON_CHECK_PROPERTIES, "Checking required properties: {0}"),
    (keys::JSON_MISSING_PROPS, "Missing required properties: {0}"),
    (keys::JSON_INVALID_PROPERTY, "Input property has an unexpected type: {0}"),
    (keys::CREDENTIALS_PARTIAL, "Both username and password must be provided together"),
    (keys::LOG_GET_SERVICE, "Getting service with input: {0}"),
    (keys::LOG_SET_SERVICE, "Setting service with input: {0}"),
    (keys::LOG_DELETE_SERVICE, "Deleting service with input: {0}"),
    (keys::LOG_EXPORT_SERVICES, "Exporting all services"),
    (keys::LOG_COMMAND_FAILED, "Command failed: {0}"),
    (keys::SERVICE_GET_RETRIEVING, "Retrieving service '{0}'"),
    (keys::SERVICE_GET_NOT_FOUND, "Service '{0}' was not found"),
    (keys::SERVICE_GET_STATUS_ERROR, "Failed to query service '{0}': {1}"),
    (keys::SERVICE_SET_CREATING_WITH_PARAMS, "Creating service with parameters: {0}"),
    (keys::SERVICE_SET_CREATED_SUCCESS, "Service '{0}' created successfully"),
    (keys::SERVICE_SET_EXISTS_UPDATING, "Service '{0}' already exists, updating its configuration"),
    (keys::SERVICE_SET_UPDATED_SUCCESS, "Service '{0}' updated successfully"),
    (keys::SERVICE_SET_UPDATE_ERROR, "Failed to create or update service '{0}': {1}"),
    (
        keys::SERVICE_SET_DESCRIPTION_ERROR,
        "Failed to set the description of new service '{0}', removing it again: {1}",
    ),
    (
        keys::SERVICE_SET_ROLLBACK_ERROR,
        "Failed to remove service '{0}' after an incomplete create: {1}",
    ),
    (keys::SERVICE_DELETE_STOPPING, "Stopping service '{0}' before deletion"),
    (keys::SERVICE_DELETE_ALREADY_STOPPED, "Service '{0}' is already stopped"),
    (keys::SERVICE_DELETE_STOP_ERROR, "Failed to stop service '{0}': {1}"),
    (keys::SERVICE_DELETE_DELETING, "Deleting service '{0}'"),
    (keys::SERVICE_DELETE_DELETED_SUCCESS, "Service '{0}' deleted successfully"),
    (keys::SERVICE_DELETE_ERROR, "Failed to delete service '{0}': {1}"),
    (keys::SERVICE_EXPORT_RETRIEVING, "Retrieving all services"),
    (keys::SERVICE_EXPORT_DETAIL_ERROR, "Skipping service '{0}': {1}"),
    (keys::SERVICE_EXPORT_ERROR, "Failed to export services: {0}"),
    (keys::WHAT_IF_SERVICE_CREATE, "Service '{0}' does not exist, will be created"),
    (keys::WHAT_IF_ACCESS_DENIED, "Access denied while querying service '{0}'"),
    (keys::WHAT_IF_QUERY_ERROR, "Error getting current service info: {0}"),
    (keys::WHAT_IF_CHANGES, "Service '{0}' would change: {1}"),
    (keys::WHAT_IF_NO_CHANGES, "Service '{0}' already matches the desired state"),
    (keys::WHAT_IF_SERVICE_DELETE, "Service '{0}' exists and will be deleted."),
    (keys::WHAT_IF_SERVICE_MISSING, "Service '{0}' does not exist or cannot be accessed."),
];

const CATALOGS: &[(&str, Table)] = &[(DEFAULT_LOCALE, EN_US)];

/// Built-in message catalog.
///
/// Locales without a table fall back to `en-us`; unknown ids are returned as-is.
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    locale: &'static str,
    table: Table,
}

impl Catalog {
    pub fn for_locale(locale: &str) -> Self {
        let language = locale.split('-').next().unwrap_or_default();
        CATALOGS
            .iter()
            .find(|(code, _)| *code == locale)
            .or_else(|| CATALOGS.iter().find(|(code, _)| code.split('-').next() == Some(language)))
            .map(|(code, table)| Self { locale: code, table })
            .unwrap_or_default()
    }

    pub fn locale(&self) -> &'static str {
        self.locale
    }

    fn lookup(&self, key: &str) -> Option<&'static str> {
        self.table
            .iter()
            .find(|(id, _)| *id == key)
            .map(|(_, template)| *template)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            locale: DEFAULT_LOCALE,
            table: EN_US,
        }
    }
}

impl Localizer for Catalog {
    fn text(&self, key: &str, args: &[&dyn Display]) -> String {
        substitute(self.lookup(key).unwrap_or(key), args)
    }
}

/// Replaces `{n}` with the n-th argument. Placeholders without a matching argument are kept.
fn substitute(template: &str, args: &[&dyn Display]) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        output.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let replaced = after.find('}').and_then(|close| {
            let index: usize = after[..close].parse().ok()?;
            let arg = args.get(index)?;
            Some((arg.to_string(), close))
        });

        match replaced {
            Some((value, close)) => {
                output.push_str(&value);
                rest = &after[close + 1..];
            }
            None => {
                output.push('{');
                rest = after;
            }
        }
    }

    output.push_str(rest);
    output
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_positional_arguments() {
        let catalog = Catalog::default();
        let text = catalog.text(keys::SERVICE_GET_STATUS_ERROR, &[&"Spooler", &"os error 5"]);
        assert_eq!(text, "Failed to query service 'Spooler': os error 5");
    }

    #[test]
    fn unknown_key_is_returned_verbatim() {
        let catalog = Catalog::default();
        assert_eq!(catalog.text("noSuchMessage", &[]), "noSuchMessage");
        assert_eq!(catalog.text("value {0}", &[&42]), "value 42");
    }

    #[test]
    fn placeholders_without_arguments_are_kept() {
        assert_eq!(substitute("a {0} b {1}", &[&"x"]), "a x b {1}");
        assert_eq!(substitute("{not a number}", &[&"x"]), "{not a number}");
        assert_eq!(substitute("trailing {", &[]), "trailing {");
    }

    #[test]
    fn unknown_locale_falls_back_to_english() {
        assert_eq!(Catalog::for_locale("fr-fr").locale(), "en-us");
        assert_eq!(Catalog::for_locale("en-gb").locale(), "en-us");
    }

    #[test]
    fn message_ids_are_unique() {
        let mut ids: Vec<&str> = EN_US.iter().map(|(id, _)| *id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), EN_US.len());
    }
}

//! Relation embedding from the `embed` parameter.

use bookland_persistence::types::Scope;

use super::split_list;
use crate::error::InvalidParam;
use crate::schema::ResourceSchema;

/// Marks requested relations for batched loading.
pub struct EagerLoader;

impl EagerLoader {
    /// Validates every name in the comma-separated `embed` list.
    ///
    /// Valid relations are added to the scope as eager loads and returned in
    /// request order for the presenter; each unknown name reports
    /// `embed=<name>`.
    pub fn apply(
        scope: Scope,
        schema: &ResourceSchema,
        embed: Option<&str>,
    ) -> (Scope, Vec<String>, Vec<InvalidParam>) {
        let (embeds, errors) = Self::validate(schema, embed);

        let scope = embeds
            .iter()
            .filter_map(|name| schema.relation(name))
            .fold(scope, |scope, relation| scope.with_eager_load(relation.clone()));

        (scope, embeds, errors)
    }

    /// Splits and validates the `embed` list without touching a scope.
    pub fn validate(schema: &ResourceSchema, embed: Option<&str>) -> (Vec<String>, Vec<InvalidParam>) {
        let mut embeds = Vec::new();
        let mut errors = Vec::new();

        for name in split_list(embed) {
            if schema.relation(&name).is_some() {
                embeds.push(name);
            } else {
                errors.push(InvalidParam::new("embed", name));
            }
        }

        (embeds, errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    #[test]
    fn test_valid_embeds_become_eager_loads() {
        let (scope, embeds, errors) =
            EagerLoader::apply(Scope::all("books"), &catalog::books(), Some("author,publisher"));

        assert!(errors.is_empty());
        assert_eq!(embeds, vec!["author", "publisher"]);
        let loads: Vec<&str> = scope.eager_loads().iter().map(|r| r.name()).collect();
        assert_eq!(loads, vec!["author", "publisher"]);
    }

    #[test]
    fn test_unknown_relations_are_reported() {
        let (_, embeds, errors) =
            EagerLoader::apply(Scope::all("books"), &catalog::books(), Some("fake,author,books"));

        assert_eq!(embeds, vec!["author"]);
        assert_eq!(
            errors,
            vec![InvalidParam::new("embed", "fake"), InvalidParam::new("embed", "books")]
        );
    }

    #[test]
    fn test_absent_or_blank_embed() {
        let (scope, embeds, errors) = EagerLoader::apply(Scope::all("books"), &catalog::books(), None);
        assert!(embeds.is_empty() && errors.is_empty());
        assert!(scope.eager_loads().is_empty());

        let (embeds, errors) = EagerLoader::validate(&catalog::books(), Some(" , "));
        assert!(embeds.is_empty() && errors.is_empty());
    }
}

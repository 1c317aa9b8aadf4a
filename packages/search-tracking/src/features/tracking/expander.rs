use crate::features::mapping::MappingFieldDescriptor;
use crate::shared::models::PropertyPath;
use crate::shared::ports::SchemaModel;
use tracing::debug;

/// Expands reference-valued mapping fields into the paths their document
/// value is implicitly derived from
///
/// A field declared as just `customer` renders the customer's instance name,
/// so each identity-contributing property of `Customer` becomes one more
/// effective path (`customer.firstName`, `customer.lastName`).
pub struct PathExpander<'a> {
    schema: &'a dyn SchemaModel,
}

impl<'a> PathExpander<'a> {
    pub fn new(schema: &'a dyn SchemaModel) -> Self {
        Self { schema }
    }

    pub fn expand(&self, descriptor: &MappingFieldDescriptor) -> Vec<PropertyPath> {
        let path = &descriptor.property_path;
        let Some(target) = path.range().and_then(|range| range.reference_target()) else {
            return vec![path.clone()];
        };

        let identity = self.schema.identity_properties_of(target.as_str());
        debug!("Instance name properties of {}: {:?}", target, identity);

        // Without identity properties the reference itself is still tracked
        if identity.is_empty() {
            return vec![path.clone()];
        }

        identity
            .into_iter()
            .map(|property| path.child(property.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::schema::StaticSchema;
    use crate::shared::models::ScalarKind;

    fn schema() -> StaticSchema {
        StaticSchema::builder()
            .entity("Order", |e| {
                e.scalar("number", ScalarKind::String)
                    .reference("customer", "Customer")
                    .collection("tags", "Tag")
            })
            .entity("Customer", |e| {
                e.scalar("firstName", ScalarKind::String)
                    .scalar("lastName", ScalarKind::String)
                    .instance_name(["firstName", "lastName"])
            })
            .entity("Tag", |e| e.scalar("code", ScalarKind::String))
            .build()
            .unwrap()
    }

    fn descriptor(schema: &StaticSchema, property: &str) -> MappingFieldDescriptor {
        let hop = schema.property("Order", property).unwrap().clone();
        MappingFieldDescriptor::new(PropertyPath::root_of("Order").child(hop))
    }

    #[test]
    fn test_scalar_field_is_kept() {
        let schema = schema();
        let expander = PathExpander::new(&schema);
        let field = descriptor(&schema, "number");

        assert_eq!(expander.expand(&field), vec![field.property_path.clone()]);
    }

    #[test]
    fn test_reference_field_expands_to_identity_properties() {
        let schema = schema();
        let expander = PathExpander::new(&schema);

        let paths: Vec<String> = expander
            .expand(&descriptor(&schema, "customer"))
            .iter()
            .map(PropertyPath::dotted)
            .collect();
        assert_eq!(paths, vec!["customer.firstName", "customer.lastName"]);
    }

    #[test]
    fn test_reference_without_identity_properties() {
        let schema = schema();
        let expander = PathExpander::new(&schema);
        let field = descriptor(&schema, "tags");

        assert_eq!(expander.expand(&field), vec![field.property_path.clone()]);
    }
}

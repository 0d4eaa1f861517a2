use serde::Serialize;

use super::attributes::{build_attribute, build_attributes, Attribute};
use super::naming::to_rack_path;
use crate::spec::{Operation, SchemaGraph};

/// One line of the route table.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteModel {
    /// Lowercase Hanami route helper, e.g. `get`
    pub method: String,
    /// Rack path, e.g. `/books/:bookId`
    pub path: String,
    pub module_name: String,
    pub operation_name: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RoutesModel {
    pub app_name: String,
    pub routes: Vec<RouteModel>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ActionModel {
    pub app_name: String,
    pub action_name: String,
    pub module_name: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ServiceModel {
    pub app_name: String,
    pub service_name: String,
    pub module_name: String,
}

/// Request and response contracts of a single operation.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ContractModel {
    pub operation_name: String,
    pub request_contract_name: String,
    /// Body attributes followed by path/query parameters
    pub request_attributes: Vec<Attribute>,
    pub response_contract_name: String,
    pub response_attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ContractsModel {
    pub app_name: String,
    pub contracts: Vec<ContractModel>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SchemaModel {
    pub schema_name: String,
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SchemasModel {
    pub app_name: String,
    pub schemas: Vec<SchemaModel>,
}

/// Everything the renderer needs for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateModels {
    pub routes: RoutesModel,
    pub actions: Vec<ActionModel>,
    pub services: Vec<ServiceModel>,
    pub contracts: ContractsModel,
    pub schemas: SchemasModel,
}

pub fn route_model(operation: &Operation) -> RouteModel {
    RouteModel {
        method: operation.method.as_str().to_ascii_lowercase(),
        path: to_rack_path(&operation.path),
        module_name: operation.module_name.clone(),
        operation_name: operation.operation_id.clone(),
    }
}

pub fn action_model(app_name: &str, operation: &Operation) -> ActionModel {
    ActionModel {
        app_name: app_name.to_string(),
        action_name: operation.operation_id.clone(),
        module_name: operation.module_name.clone(),
    }
}

pub fn service_model(app_name: &str, operation: &Operation) -> ServiceModel {
    ServiceModel {
        app_name: app_name.to_string(),
        service_name: format!("{}Service", operation.operation_id),
        module_name: operation.module_name.clone(),
    }
}

pub fn contract_model(operation: &Operation) -> ContractModel {
    let mut request_attributes = operation
        .request_body_schema
        .as_ref()
        .map(build_attributes)
        .unwrap_or_default();
    request_attributes.extend(
        operation
            .parameters
            .iter()
            .map(|param| build_attribute(&param.name, &param.schema, param.required)),
    );

    ContractModel {
        operation_name: operation.operation_id.clone(),
        request_contract_name: format!("{}RequestContract", operation.operation_id),
        request_attributes,
        response_contract_name: format!("{}ResponseContract", operation.operation_id),
        response_attributes: build_attributes(&operation.success_response_schema),
    }
}

/// One model per component schema, in component-name order.
///
/// A component that is itself an alias of another is listed with the
/// attributes of the component it resolves to.
pub fn schemas_model(app_name: &str, graph: &SchemaGraph) -> SchemasModel {
    let schemas = graph
        .component_schemas()
        .iter()
        .map(|(name, node)| SchemaModel {
            schema_name: name.clone(),
            attributes: graph
                .resolve_root(node)
                .map(build_attributes)
                .unwrap_or_default(),
        })
        .collect();
    SchemasModel {
        app_name: app_name.to_string(),
        schemas,
    }
}

/// Assemble every template model for a run.
pub fn assemble(app_name: &str, operations: &[Operation], graph: &SchemaGraph) -> TemplateModels {
    TemplateModels {
        routes: RoutesModel {
            app_name: app_name.to_string(),
            routes: operations.iter().map(route_model).collect(),
        },
        actions: operations
            .iter()
            .map(|op| action_model(app_name, op))
            .collect(),
        services: operations
            .iter()
            .map(|op| service_model(app_name, op))
            .collect(),
        contracts: ContractsModel {
            app_name: app_name.to_string(),
            contracts: operations.iter().map(contract_model).collect(),
        },
        schemas: schemas_model(app_name, graph),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{Parameter, ParameterLocation, SchemaNode};
    use http::Method;
    use serde_json::json;

    fn operation() -> Operation {
        Operation {
            method: Method::PUT,
            path: "/pets/{petId}".to_string(),
            module_name: "pets".to_string(),
            operation_id: "UpdatePet".to_string(),
            request_body_schema: Some(SchemaNode::from_value(&json!({
                "type": "object",
                "required": ["name"],
                "properties": { "name": { "type": "string" } }
            }))),
            success_response_schema: SchemaNode::Reference("Pet".to_string()),
            parameters: vec![
                Parameter {
                    name: "petId".to_string(),
                    location: ParameterLocation::Path,
                    required: true,
                    schema: SchemaNode::Integer,
                },
                Parameter {
                    name: "dryRun".to_string(),
                    location: ParameterLocation::Query,
                    required: false,
                    schema: SchemaNode::String { format: None },
                },
            ],
        }
    }

    #[test]
    fn test_route_model() {
        let route = route_model(&operation());
        assert_eq!(route.method, "put");
        assert_eq!(route.path, "/pets/:petId");
        assert_eq!(route.module_name, "pets");
        assert_eq!(route.operation_name, "UpdatePet");
    }

    #[test]
    fn test_service_name_suffix() {
        let service = service_model("PetStore", &operation());
        assert_eq!(service.service_name, "UpdatePetService");
        assert_eq!(service.app_name, "PetStore");
    }

    #[test]
    fn test_contract_appends_parameters_after_body() {
        let contract = contract_model(&operation());
        let names: Vec<&str> = contract
            .request_attributes
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(names, vec!["name", "petId", "dryRun"]);
        assert!(contract.request_attributes[1].required);
        assert!(!contract.request_attributes[2].required);
        assert_eq!(contract.request_contract_name, "UpdatePetRequestContract");
        assert_eq!(contract.response_contract_name, "UpdatePetResponseContract");
    }
}

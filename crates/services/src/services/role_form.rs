use models::access::{CreateRole, Role};

use super::forms::{FormError, FormMode, required};

#[derive(Debug, Clone, Default)]
pub struct RoleForm {
    mode: FormMode,
    pub name: String,
    permissions: Vec<String>,
}

impl RoleForm {
    pub fn open_create() -> Self {
        Self::default()
    }

    pub fn open_edit(role: &Role) -> Self {
        Self {
            mode: FormMode::Edit {
                id: role.id.clone(),
            },
            name: role.name.clone(),
            permissions: role.permission_ids(),
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn permissions(&self) -> &[String] {
        &self.permissions
    }

    pub fn is_selected(&self, permission_id: &str) -> bool {
        self.permissions.iter().any(|id| id == permission_id)
    }

    /// Flip one permission checkbox. Returns whether it is now selected.
    pub fn toggle(&mut self, permission_id: &str) -> bool {
        if let Some(pos) = self.permissions.iter().position(|id| id == permission_id) {
            self.permissions.remove(pos);
            false
        } else {
            self.permissions.push(permission_id.to_string());
            true
        }
    }

    pub fn submit(&self) -> Result<CreateRole, FormError> {
        Ok(CreateRole {
            name: required("name", &self.name)?,
            permissions: self.permissions.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_adds_then_removes() {
        let mut form = RoleForm::open_create();
        form.name = "pond_operator".to_string();
        assert!(form.toggle("x1"));
        assert!(form.toggle("x2"));
        assert!(!form.toggle("x1"));
        assert!(!form.is_selected("x1"));

        let payload = form.submit().unwrap();
        assert_eq!(payload.name, "pond_operator");
        assert_eq!(payload.permissions, vec!["x2"]);
    }

    #[test]
    fn edit_starts_from_populated_role() {
        let role: Role = serde_json::from_str(
            r#"{"_id":"r1","name":"admin","permissions":[{"_id":"x1","name":"farm.read"}]}"#,
        )
        .unwrap();
        let form = RoleForm::open_edit(&role);
        assert_eq!(form.mode().record_id(), Some("r1"));
        assert!(form.is_selected("x1"));
    }

    #[test]
    fn name_is_required() {
        assert_eq!(
            RoleForm::open_create().submit(),
            Err(FormError::MissingField("name"))
        );
    }
}

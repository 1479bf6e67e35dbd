// Class lifecycle: create, update, delete. Ownership is enforced at the
// service level; the actor id comes from the caller.

use chrono::Utc;

use crate::core::UserRole;
use crate::database::Database;
use crate::error::{AppError, AppResult};
use crate::models::{ClassCreatePayload, ClassUpdatePayload, DanceClass, User};

#[derive(Clone)]
pub struct ClassManagerService {
    db: Database,
}

impl ClassManagerService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn create_class(
        &self,
        instructor_id: &str,
        payload: &ClassCreatePayload,
    ) -> AppResult<DanceClass> {
        payload.validate()?;

        let instructor = self.db.get_user(instructor_id).await?.ok_or_else(|| {
            AppError::Validation(format!("instructor {} does not exist", instructor_id))
        })?;
        if instructor.role != UserRole::Instructor {
            return Err(AppError::Validation(format!(
                "user {} is not an instructor",
                instructor_id
            )));
        }

        if let Some(location_id) = &payload.location_id {
            if self.db.get_location(location_id).await?.is_none() {
                return Err(AppError::Validation(format!(
                    "location {} does not exist",
                    location_id
                )));
            }
        }

        let class = self
            .db
            .insert_class(
                instructor_id,
                payload.name.trim(),
                &payload.description,
                payload.level,
                payload.style,
                payload.max_capacity,
                payload.price,
                payload.start_date,
                payload.end_date,
                payload.location_id.as_deref(),
            )
            .await?;

        tracing::info!(class_id = %class.id, instructor_id, "created class");
        Ok(class)
    }

    pub async fn update_class(
        &self,
        class_id: &str,
        actor_id: &str,
        patch: &ClassUpdatePayload,
    ) -> AppResult<DanceClass> {
        let mut class = self
            .db
            .get_class(class_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("class {} not found", class_id)))?;
        self.require_owner_or_admin(&class, actor_id).await?;

        if let Some(name) = &patch.name {
            if name.trim().is_empty() {
                return Err(AppError::Validation("class name must not be blank".to_string()));
            }
            class.name = name.trim().to_string();
        }
        if let Some(description) = &patch.description {
            class.description = description.clone();
        }
        if let Some(level) = patch.level {
            class.level = level;
        }
        if let Some(style) = patch.style {
            class.style = style;
        }
        if let Some(max_capacity) = patch.max_capacity {
            if max_capacity < 1 {
                return Err(AppError::Validation(
                    "max_capacity must be at least 1".to_string(),
                ));
            }
            class.max_capacity = max_capacity;
        }
        if let Some(price) = patch.price {
            if price < 0.0 {
                return Err(AppError::Validation("price must not be negative".to_string()));
            }
            class.price = price;
        }
        if let Some(start_date) = patch.start_date {
            class.start_date = start_date;
        }
        if let Some(end_date) = patch.end_date {
            class.end_date = end_date;
        }
        if class.end_date < class.start_date {
            return Err(AppError::Validation(
                "end_date must not be before start_date".to_string(),
            ));
        }
        if let Some(location_id) = &patch.location_id {
            if let Some(location_id) = location_id {
                if self.db.get_location(location_id).await?.is_none() {
                    return Err(AppError::Validation(format!(
                        "location {} does not exist",
                        location_id
                    )));
                }
            }
            class.location_id = location_id.clone();
        }
        if let Some(is_active) = patch.is_active {
            class.is_active = is_active;
        }
        class.updated_at = Utc::now();

        sqlx::query(
            "UPDATE dance_classes
             SET name = ?, description = ?, level = ?, style = ?, max_capacity = ?,
                 price = ?, start_date = ?, end_date = ?, location_id = ?, is_active = ?,
                 updated_at = ?
             WHERE id = ?",
        )
        .bind(&class.name)
        .bind(&class.description)
        .bind(class.level.as_str())
        .bind(class.style.as_str())
        .bind(class.max_capacity)
        .bind(class.price)
        .bind(class.start_date)
        .bind(class.end_date)
        .bind(&class.location_id)
        .bind(class.is_active)
        .bind(class.updated_at)
        .bind(&class.id)
        .execute(self.db.pool())
        .await
        .map_err(|e| AppError::Database(format!("failed to update class: {}", e)))?;

        tracing::info!(class_id = %class.id, actor_id, "updated class");
        Ok(class)
    }

    /// Deletes a class; schedules and reviews cascade with it.
    pub async fn delete_class(&self, class_id: &str, actor_id: &str) -> AppResult<()> {
        let class = self
            .db
            .get_class(class_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("class {} not found", class_id)))?;
        self.require_owner_or_admin(&class, actor_id).await?;

        sqlx::query("DELETE FROM dance_classes WHERE id = ?")
            .bind(class_id)
            .execute(self.db.pool())
            .await
            .map_err(|e| AppError::Database(format!("failed to delete class: {}", e)))?;

        tracing::info!(class_id, actor_id, "deleted class");
        Ok(())
    }

    async fn require_owner_or_admin(&self, class: &DanceClass, actor_id: &str) -> AppResult<User> {
        let actor = self
            .db
            .get_user(actor_id)
            .await?
            .ok_or_else(|| AppError::Forbidden("unknown actor".to_string()))?;
        if actor.id != class.instructor_id && actor.role != UserRole::Admin {
            return Err(AppError::Forbidden(
                "only the class owner or an admin may modify a class".to_string(),
            ));
        }
        Ok(actor)
    }
}

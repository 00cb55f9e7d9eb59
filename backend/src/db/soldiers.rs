use crate::db::ID_CHUNK;
use crate::error::AppError;
use crate::models::{new_id, Soldier, SoldierInput};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

pub async fn list_soldiers(pool: &SqlitePool) -> Result<Vec<Soldier>, AppError> {
    let soldiers = sqlx::query_as::<_, Soldier>(
        r#"
        SELECT id, first_name, last_name, personal_number, phone, company, department,
               equipment, notes, created_at, updated_at
        FROM soldiers
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(soldiers)
}

pub async fn get_soldier(pool: &SqlitePool, id: &str) -> Result<Option<Soldier>, AppError> {
    let soldier = sqlx::query_as::<_, Soldier>(
        r#"
        SELECT id, first_name, last_name, personal_number, phone, company, department,
               equipment, notes, created_at, updated_at
        FROM soldiers
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(soldier)
}

/// ID 목록에 해당하는 병사들을 조회합니다. 없는 ID는 결과에서 빠집니다.
///
/// 바인딩 한도를 넘지 않도록 `ID_CHUNK`개씩 나눠 조회합니다.
pub async fn get_soldiers_by_ids(pool: &SqlitePool, ids: &[String]) -> Result<Vec<Soldier>, AppError> {
    let mut soldiers = Vec::with_capacity(ids.len());

    for chunk in ids.chunks(ID_CHUNK) {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT id, first_name, last_name, personal_number, phone, company, department, \
             equipment, notes, created_at, updated_at FROM soldiers WHERE id IN (",
        );
        let mut separated = builder.separated(", ");
        for id in chunk {
            separated.push_bind(id);
        }
        separated.push_unseparated(")");

        soldiers.extend(builder.build_query_as::<Soldier>().fetch_all(pool).await?);
    }

    Ok(soldiers)
}

/// 개인번호(personal_number) 기준으로 삽입하거나 갱신합니다.
/// 기존 레코드의 ID는 유지됩니다.
///
/// 갱신 시에는 입력에 있는 컬럼(`Some`)만 덮어씁니다.
pub async fn upsert_soldier(pool: &SqlitePool, input: &SoldierInput) -> Result<Soldier, AppError> {
    let text = |value: &Option<String>| value.clone().unwrap_or_default();

    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
        "INSERT INTO soldiers (id, first_name, last_name, personal_number, phone, company, \
         department, equipment, notes) VALUES (",
    );
    builder
        .separated(", ")
        .push_bind(new_id())
        .push_bind(text(&input.first_name))
        .push_bind(text(&input.last_name))
        .push_bind(input.personal_number.clone())
        .push_bind(text(&input.phone))
        .push_bind(text(&input.company))
        .push_bind(text(&input.department))
        .push_bind(input.equipment_value().map(str::to_string))
        .push_bind(text(&input.notes));
    builder.push(
        ") ON CONFLICT(personal_number) DO UPDATE SET \
         updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
    );

    // 입력에 있는 컬럼만 SET 목록에 추가
    let present = [
        ("first_name", input.first_name.is_some()),
        ("last_name", input.last_name.is_some()),
        ("phone", input.phone.is_some()),
        ("company", input.company.is_some()),
        ("department", input.department.is_some()),
        ("equipment", input.equipment.is_some()),
        ("notes", input.notes.is_some()),
    ];
    for (column, is_present) in present {
        if is_present {
            builder.push(format!(", {column} = excluded.{column}"));
        }
    }

    builder.build().execute(pool).await?;

    let soldier = sqlx::query_as::<_, Soldier>(
        r#"
        SELECT id, first_name, last_name, personal_number, phone, company, department,
               equipment, notes, created_at, updated_at
        FROM soldiers
        WHERE personal_number = ?
        "#,
    )
    .bind(&input.personal_number)
    .fetch_one(pool)
    .await?;

    Ok(soldier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    fn input(personal_number: &str, company: &str) -> SoldierInput {
        SoldierInput {
            personal_number: personal_number.to_string(),
            first_name: Some("Noa".to_string()),
            last_name: Some("Cohen".to_string()),
            company: Some(company.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn upsert_keeps_id_and_updates_fields() {
        let pool = test_pool().await;

        let first = upsert_soldier(&pool, &input("7001", "A")).await.unwrap();
        let second = upsert_soldier(&pool, &input("7001", "B")).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.company, "B");
        assert_eq!(list_soldiers(&pool).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn fetches_only_requested_ids() {
        let pool = test_pool().await;
        let a = upsert_soldier(&pool, &input("1", "A")).await.unwrap();
        upsert_soldier(&pool, &input("2", "A")).await.unwrap();

        let found = get_soldiers_by_ids(&pool, &[a.id.clone(), "ffffffffffffffffffffffff".to_string()])
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, a.id);
        assert!(get_soldier(&pool, "ffffffffffffffffffffffff").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn upsert_leaves_absent_columns_untouched() {
        let pool = test_pool().await;
        let full = SoldierInput {
            personal_number: "100".to_string(),
            first_name: Some("Avi".to_string()),
            last_name: Some("Levi".to_string()),
            phone: Some("050-000-0000".to_string()),
            company: Some("A".to_string()),
            department: Some("2".to_string()),
            equipment: Some("M16".to_string()),
            notes: Some("driver".to_string()),
        };
        let before = upsert_soldier(&pool, &full).await.unwrap();

        let partial = SoldierInput {
            personal_number: "100".to_string(),
            company: Some("B".to_string()),
            ..Default::default()
        };
        let after = upsert_soldier(&pool, &partial).await.unwrap();

        assert_eq!(after.id, before.id);
        assert_eq!(after.company, "B");
        assert_eq!(after.first_name, "Avi");
        assert_eq!(after.last_name, "Levi");
        assert_eq!(after.phone, "050-000-0000");
        assert_eq!(after.department, "2");
        assert_eq!(after.equipment.as_deref(), Some("M16"));
        assert_eq!(after.notes, "driver");
    }

    #[tokio::test]
    async fn present_but_empty_equipment_clears_it() {
        let pool = test_pool().await;
        let mut soldier = input("100", "A");
        soldier.equipment = Some("M16".to_string());
        upsert_soldier(&pool, &soldier).await.unwrap();

        soldier.equipment = Some(String::new());
        let cleared = upsert_soldier(&pool, &soldier).await.unwrap();
        assert_eq!(cleared.equipment, None);
    }

    #[tokio::test]
    async fn partial_input_inserts_with_empty_defaults() {
        let pool = test_pool().await;
        let created = upsert_soldier(
            &pool,
            &SoldierInput {
                personal_number: "555".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(created.first_name, "");
        assert_eq!(created.equipment, None);
    }

    #[tokio::test]
    async fn fetches_more_ids_than_one_chunk() {
        let pool = test_pool().await;
        let mut ids = Vec::new();
        for i in 0..ID_CHUNK + 20 {
            let soldier = upsert_soldier(&pool, &input(&format!("{}", 1000 + i), "A"))
                .await
                .unwrap();
            ids.push(soldier.id);
        }
        ids.push("ffffffffffffffffffffffff".to_string());

        let found = get_soldiers_by_ids(&pool, &ids).await.unwrap();
        assert_eq!(found.len(), ID_CHUNK + 20);
    }
}

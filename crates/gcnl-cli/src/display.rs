//! Plain-text listing of analysis results, grouped by entity type.

use std::fmt::Write;

use gcnl_core::{Entity, EntityGroups};

const MAX_OFFSETS: usize = 10;

// ── Public API ──

/// Print every group as a header followed by one line per entity.
pub fn print_entity_groups(groups: &EntityGroups) {
    print!("{}", render_entity_groups(groups));
}

pub fn render_entity_groups(groups: &EntityGroups) -> String {
    if groups.is_empty() {
        return "(no entities)\n".to_string();
    }

    let mut out = String::new();
    for (ty, entities) in groups.iter() {
        let _ = writeln!(out, "=== {} ({}) ===", ty, entities.len());
        for entity in entities {
            render_entity(&mut out, entity);
        }
        out.push('\n');
    }
    let _ = writeln!(
        out,
        "{} entities across {} types",
        groups.len(),
        groups.type_count()
    );
    out
}

// ── Entity rendering ──

fn render_entity(out: &mut String, entity: &Entity) {
    let _ = writeln!(
        out,
        "  {:<26} salience {:.3}  mentions {}",
        entity.name,
        entity.salience,
        format_offsets(entity)
    );
    for (key, value) in &entity.metadata {
        let _ = writeln!(out, "    {:<24} {}", key, value);
    }
}

fn format_offsets(entity: &Entity) -> String {
    let offsets: Vec<String> = entity
        .mentions
        .iter()
        .take(MAX_OFFSETS)
        .map(|m| format!("@{}", m.text_span.begin_offset))
        .collect();
    let mut s = offsets.join(", ");
    if entity.mentions.len() > MAX_OFFSETS {
        let _ = write!(s, " (+{} more)", entity.mentions.len() - MAX_OFFSETS);
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use gcnl_core::{EntityType, Mention, TextSpan};
    use std::collections::BTreeMap;

    fn entity(name: &str, ty: EntityType, offsets: &[i64]) -> Entity {
        Entity {
            name: name.into(),
            entity_type: ty,
            metadata: BTreeMap::new(),
            salience: 0.25,
            mentions: offsets
                .iter()
                .map(|&begin_offset| Mention {
                    text_span: TextSpan {
                        content: name.into(),
                        begin_offset,
                    },
                })
                .collect(),
        }
    }

    #[test]
    fn empty_groups() {
        assert_eq!(render_entity_groups(&EntityGroups::new()), "(no entities)\n");
    }

    #[test]
    fn renders_headers_and_entities() {
        let mut paris = entity("Paris", EntityType::Location, &[0, 40]);
        paris.metadata.insert("mid".into(), "/m/05qtj".into());
        let groups =
            EntityGroups::from_entities([paris, entity("Hugo", EntityType::Person, &[12])]);

        let out = render_entity_groups(&groups);
        let person = out.find("=== PERSON (1) ===").unwrap();
        let location = out.find("=== LOCATION (1) ===").unwrap();
        assert!(person < location);
        assert!(out.contains("salience 0.250  mentions @0, @40"));
        assert!(out.contains("    mid"));
        assert!(out.contains("/m/05qtj"));
        assert!(out.ends_with("2 entities across 2 types\n"));
    }

    #[test]
    fn long_mention_lists_are_truncated() {
        let offsets: Vec<i64> = (0..13).collect();
        let e = entity("a", EntityType::Other, &offsets);
        let s = format_offsets(&e);
        assert!(s.starts_with("@0, @1"));
        assert!(s.ends_with("@9 (+3 more)"));
    }
}

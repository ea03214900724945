//! Generic lesson plan returned when the live pipeline fails

/// Display values substituted into the generic plan
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackPlaceholders
{   pub subject: String
  , pub thematic_unit: String
  , pub knowledge_objective: String
}

impl Default for FallbackPlaceholders
{   fn default() -> Self
    {   FallbackPlaceholders
        {   subject: "[Componente]".to_string()
          , thematic_unit: "[Unidade Temática]".to_string()
          , knowledge_objective:
              "[Objetivo de Conhecimento]".to_string()
        }
    }
}

/// Fixed plan with the same section structure as a live completion.
/// Always succeeds; callers can render it exactly like a real result.
pub fn generic_lesson_plan(
  placeholders: &FallbackPlaceholders
) -> String
{   GENERIC_PLAN_TEMPLATE
      .replace("{componente}", &placeholders.subject)
      .replace("{unidade_tematica}", &placeholders.thematic_unit)
      .replace(
        "{objetivo_conhecimento}",
        &placeholders.knowledge_objective
      )
}

const GENERIC_PLAN_TEMPLATE: &str = r#"# Plano de Aula Genérico

## Informações Gerais 📋
- **Duração Total:** 40 minutos
- **Componente Curricular:** {componente}
- **Unidade Temática:** {unidade_tematica}
- **Objetivo de Conhecimento:** {objetivo_conhecimento}

## Objetivo Geral 🎯
Fornecer uma introdução geral ao tema abordado.

## Estratégias Diferenciadas 🧩
- Apoio individual para alunos com maior dificuldade.
- Atividades complementares para alunos com maior autonomia.

## Etapas da Aula ⏱️
### 1. Abertura e Sensibilização (10 minutos)
- **Atividade:** Introdução ao tema com discussão breve.
- **Objetivo:** Engajar os alunos no assunto.

### 2. Desenvolvimento Principal (20 minutos)
- **Atividade:** Explicação detalhada e prática guiada.
- **Objetivo:** Promover a compreensão e participação ativa dos alunos.

### 3. Fechamento e Avaliação (10 minutos)
- **Atividade:** Revisão e perguntas finais.
- **Objetivo:** Consolidar o aprendizado e avaliar a compreensão.

## Materiais Necessários 📚
- Material didático básico
- Quadro branco e marcadores

## Avaliação e Acompanhamento 📊
- Observação direta e registro do progresso dos alunos.
"#;

//! Prompt construction for lesson plans and activities
//!
//! Templates are plain data: swapping the wording never touches the
//! completion client.

use serde::{Deserialize, Serialize};

/// System message sent with every completion request
pub const SYSTEM_MESSAGE: &str
  = "Você é um especialista em educação, focado em criar planos de aula detalhados e personalizados.";

/// Section headers every generated or fallback plan must carry
pub const SECTION_MARKERS: [&str; 6] =
[   "## Informações Gerais"
  , "## Objetivo Geral"
  , "## Estratégias Diferenciadas"
  , "## Etapas da Aula"
  , "## Materiais Necessários"
  , "## Avaliação e Acompanhamento"
];

/// Check that a document carries every required section header.
pub fn has_required_sections(text: &str) -> bool
{   SECTION_MARKERS.iter().all(|marker| text.contains(marker))
}

/// Structured pedagogical parameters for one lesson plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptRequest
{   /// Curriculum component, e.g. "Matemática"
    pub subject: String
  , /// Thematic unit within the component, e.g. "Frações"
    pub thematic_unit: String
  , /// Knowledge objective; empty when the teacher leaves it open
    pub knowledge_objective: String
  , /// Free-text summary of the class profile
    pub class_profile: String
  , /// Display date for the plan header
    pub reference_date: String
}

impl PromptRequest
{   /// Request with the optional fields left empty
    pub fn new(subject: String, thematic_unit: String) -> Self
    {   PromptRequest
        {   subject
          , thematic_unit
          , knowledge_objective: String::new()
          , class_profile: String::new()
          , reference_date: String::new()
        }
    }
}

/// Lesson-plan template held as data, with `{placeholder}` slots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptTemplate
{   pub text: String
}

impl PromptTemplate
{   /// Render the template against one request.
    /// Same input, byte-identical output.
    pub fn render(&self, request: &PromptRequest) -> String
    {   self.text
          .replace("{componente}", &request.subject)
          .replace("{unidade_tematica}", &request.thematic_unit)
          .replace(
            "{objetivo_conhecimento}",
            &request.knowledge_objective
          )
          .replace("{perfil_turma}", &request.class_profile)
          .replace("{data_referencia}", &request.reference_date)
    }
}

impl Default for PromptTemplate
{   fn default() -> Self
    {   PromptTemplate
        {   text: DEFAULT_PLAN_TEMPLATE.to_string()
        }
    }
}

const DEFAULT_PLAN_TEMPLATE: &str = r#"# Plano de Aula Personalizado

## Informações Gerais
- Componente: {componente}
- Unidade Temática: {unidade_tematica}
- Objetivo de Conhecimento: {objetivo_conhecimento}
- Perfil da Turma: {perfil_turma}
- Data de Referência: {data_referencia}

Crie um plano de aula detalhado contendo exatamente as seções abaixo:

## Objetivo Geral
Objetivo geral e objetivos específicos da aula.

## Estratégias Diferenciadas
Estratégias por nível de aprendizagem, considerando o perfil da turma.

## Etapas da Aula
Passo a passo com início, meio e fim, com a duração de cada etapa.

## Materiais Necessários
Lista dos materiais utilizados em cada etapa.

## Avaliação e Acompanhamento
Critérios de avaliação e forma de registro do progresso dos alunos.
"#;

const ACTIVITY_TEMPLATE: &str = r#"Baseado nas informações fornecidas a seguir, crie uma atividade, com um passo a passo claro, que possa ser utilizada por um professor do ensino fundamental. A atividade deve incluir:
- Introdução e contexto da atividade.
- Descrição detalhada dos passos que os alunos devem seguir.
- Perguntas desafiadoras que incentivem o pensamento crítico.
- Explicações claras para ajudar na resolução das questões.
- Dicas ou observações importantes para o professor.

Informações fornecidas: {informacoes}

Formato da resposta esperado:
1. **Introdução**
2. **Passo 1: [Descrição]**
- Pergunta: [Exemplo de questão]
- Dica: [Dica para o professor]
3. **Passo 2: [Descrição]**
- Pergunta: [Exemplo de questão]
- Dica: [Dica para o professor]
4. **Conclusão e observações finais**
"#;

/// Render the default lesson-plan template.
pub fn lesson_plan_prompt(request: &PromptRequest) -> String
{   PromptTemplate::default().render(request)
}

/// Prompt for a classroom activity built from retrieved source text.
pub fn activity_prompt(source_text: &str) -> String
{   ACTIVITY_TEMPLATE.replace("{informacoes}", source_text)
}

/// Prompt asking for at most three short tips about a class.
pub fn analysis_prompt(class_data: &str) -> String
{   format!(
      "Analise os seguintes dados da turma e forneça dicas curtas, \
       em português, no máximo 3, elas devem ser sobre a turma \
       selecionada:\n\n{}",
      class_data
    )
}

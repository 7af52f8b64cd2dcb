//! Fixed report wording in each supported locale.

use sdash_core::{ChangeType, Locale};

#[derive(Debug)]
pub struct Labels {
    pub default_title: &'static str,
    pub period: &'static str,
    pub source: &'static str,
    pub generated: &'static str,
    pub from: &'static str,
    pub until: &'static str,
    pub page: &'static str,
    pub of: &'static str,

    pub charts_heading: &'static str,
    pub charts_unavailable: &'static str,
    pub kpi_heading: &'static str,
    pub platforms_heading: &'static str,
    pub sentiment_heading: &'static str,
    pub posts_heading: &'static str,

    pub indicator: &'static str,
    pub value: &'static str,
    pub previous: &'static str,
    pub change: &'static str,
    pub trend: &'static str,
    pub platform: &'static str,
    pub reach: &'static str,
    pub impressions: &'static str,
    pub interactions: &'static str,
    pub likes: &'static str,
    pub comments: &'static str,
    pub shares: &'static str,
    pub saves: &'static str,
    pub engagement: &'static str,
    pub sentiment: &'static str,
    pub percentage: &'static str,
    pub positive: &'static str,
    pub neutral: &'static str,
    pub negative: &'static str,
    pub total: &'static str,
    pub date: &'static str,
    pub text: &'static str,
    pub id: &'static str,
    pub field: &'static str,
    pub title: &'static str,
    pub posts: &'static str,
    pub platforms: &'static str,

    pub kpi_posts: &'static str,
    pub kpi_interactions: &'static str,
    pub kpi_comments: &'static str,
    pub kpi_avg_interactions: &'static str,
    pub kpi_engagement: &'static str,

    pub chart_recent: &'static str,
    pub chart_top_days: &'static str,
    pub chart_platform_share: &'static str,
    pub chart_sentiment: &'static str,
    pub chart_tiers: &'static str,
    pub chart_top_posts: &'static str,
    pub chart_keywords: &'static str,
    pub chart_topics: &'static str,
    pub axis_date: &'static str,
    pub axis_day: &'static str,
    pub axis_tier: &'static str,
    pub axis_post: &'static str,
    pub axis_word: &'static str,
    pub axis_topic: &'static str,

    pub sheet_kpis: &'static str,
    pub sheet_platforms: &'static str,
    pub sheet_posts: &'static str,
    pub sheet_sentiment: &'static str,
    pub sheet_summary: &'static str,
}

static ES: Labels = Labels {
    default_title: "Reporte del dashboard",
    period: "Periodo",
    source: "Fuente",
    generated: "Generado",
    from: "desde",
    until: "hasta",
    page: "Página",
    of: "de",

    charts_heading: "Gráficos",
    charts_unavailable: "Los gráficos no están disponibles en este reporte.",
    kpi_heading: "Indicadores clave",
    platforms_heading: "Métricas por plataforma",
    sentiment_heading: "Sentimiento",
    posts_heading: "Publicaciones destacadas",

    indicator: "Indicador",
    value: "Valor",
    previous: "Anterior",
    change: "Cambio",
    trend: "Tendencia",
    platform: "Plataforma",
    reach: "Alcance",
    impressions: "Impresiones",
    interactions: "Interacciones",
    likes: "Me gusta",
    comments: "Comentarios",
    shares: "Compartidos",
    saves: "Guardados",
    engagement: "Engagement",
    sentiment: "Sentimiento",
    percentage: "Porcentaje",
    positive: "Positivo",
    neutral: "Neutral",
    negative: "Negativo",
    total: "Total",
    date: "Fecha",
    text: "Texto",
    id: "ID",
    field: "Campo",
    title: "Título",
    posts: "Publicaciones",
    platforms: "Plataformas",

    kpi_posts: "Publicaciones",
    kpi_interactions: "Interacciones",
    kpi_comments: "Comentarios",
    kpi_avg_interactions: "Promedio de interacciones",
    kpi_engagement: "Tasa de engagement",

    chart_recent: "Interacciones recientes",
    chart_top_days: "Días con más interacciones",
    chart_platform_share: "Interacciones por plataforma",
    chart_sentiment: "Sentimiento",
    chart_tiers: "Rendimiento de publicaciones",
    chart_top_posts: "Publicaciones con mayor alcance",
    chart_keywords: "Palabras más frecuentes",
    chart_topics: "Temas mencionados",
    axis_date: "Fecha",
    axis_day: "Día",
    axis_tier: "Nivel",
    axis_post: "Publicación",
    axis_word: "Palabra",
    axis_topic: "Tema",

    sheet_kpis: "KPIs",
    sheet_platforms: "Plataformas",
    sheet_posts: "Publicaciones",
    sheet_sentiment: "Sentimiento",
    sheet_summary: "Resumen",
};

static EN: Labels = Labels {
    default_title: "Dashboard report",
    period: "Period",
    source: "Source",
    generated: "Generated",
    from: "from",
    until: "until",
    page: "Page",
    of: "of",

    charts_heading: "Charts",
    charts_unavailable: "Charts are not available in this report.",
    kpi_heading: "Key indicators",
    platforms_heading: "Platform metrics",
    sentiment_heading: "Sentiment",
    posts_heading: "Top posts",

    indicator: "Indicator",
    value: "Value",
    previous: "Previous",
    change: "Change",
    trend: "Trend",
    platform: "Platform",
    reach: "Reach",
    impressions: "Impressions",
    interactions: "Interactions",
    likes: "Likes",
    comments: "Comments",
    shares: "Shares",
    saves: "Saves",
    engagement: "Engagement",
    sentiment: "Sentiment",
    percentage: "Percentage",
    positive: "Positive",
    neutral: "Neutral",
    negative: "Negative",
    total: "Total",
    date: "Date",
    text: "Text",
    id: "ID",
    field: "Field",
    title: "Title",
    posts: "Posts",
    platforms: "Platforms",

    kpi_posts: "Posts",
    kpi_interactions: "Interactions",
    kpi_comments: "Comments",
    kpi_avg_interactions: "Average interactions",
    kpi_engagement: "Engagement rate",

    chart_recent: "Recent interactions",
    chart_top_days: "Top days by interactions",
    chart_platform_share: "Interactions by platform",
    chart_sentiment: "Sentiment",
    chart_tiers: "Post performance",
    chart_top_posts: "Top posts by reach",
    chart_keywords: "Most frequent words",
    chart_topics: "Topics mentioned",
    axis_date: "Date",
    axis_day: "Day",
    axis_tier: "Tier",
    axis_post: "Post",
    axis_word: "Word",
    axis_topic: "Topic",

    sheet_kpis: "KPIs",
    sheet_platforms: "Platforms",
    sheet_posts: "Posts",
    sheet_sentiment: "Sentiment",
    sheet_summary: "Summary",
};

#[must_use]
pub fn labels(locale: Locale) -> &'static Labels {
    match locale {
        Locale::Es => &ES,
        Locale::En => &EN,
    }
}

impl Labels {
    #[must_use]
    pub fn change_type(&self, change_type: ChangeType) -> &'static str {
        match change_type {
            ChangeType::Positive => self.positive,
            ChangeType::Negative => self.negative,
            ChangeType::Neutral => self.neutral,
        }
    }

    /// `Página 2 de 5`.
    #[must_use]
    pub fn page_of(&self, page: usize, pages: usize) -> String {
        format!("{} {page} {} {pages}", self.page, self.of)
    }
}

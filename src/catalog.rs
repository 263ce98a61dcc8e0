use crate::models::{LoyaltyProgram, Professional, Provider, Service};

const HIGHLIGHT_CATEGORY: &str = "Combos";

/// The demo dataset for Zero Um Barber Shop. Built once at startup and
/// shared read-only through the application state.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub provider: Provider,
    pub services: Vec<Service>,
    pub professionals: Vec<Professional>,
    pub loyalty: LoyaltyProgram,
    pub policies: Vec<&'static str>,
}

impl Catalog {
    pub fn zero_um() -> Self {
        Self {
            provider: Provider {
                name: "Zero Um Barber Shop",
                handle: "zeroum.jequie",
                avatar_url: "https://storagesalon.s3.sa-east-1.amazonaws.com/237813logomarca3cc485ee218540c2e908f319ee0b53b1pc.jpg",
                rating: 4.9,
                review_count: 342,
                location: "Centro, Jequié - BA",
            },
            services: service_catalog(),
            professionals: vec![
                Professional {
                    id: "p1",
                    name: "Iwlys",
                    role: "Barbeiro",
                    avatar_url: "https://storagesalon.s3.sa-east-1.amazonaws.com/237813239886b2ebf01c5447ad5c3ec17419d9cf22fcpp.jpg",
                },
                Professional {
                    id: "p2",
                    name: "Rodrigo",
                    role: "Barbeiro",
                    avatar_url: "https://storagesalon.s3.sa-east-1.amazonaws.com/237813237813635684a28748d8a7e25eb63ed34590e3pp.jpg",
                },
                Professional {
                    id: "p3",
                    name: "Jefter",
                    role: "Barbeiro",
                    avatar_url: "https://storagesalon.s3.sa-east-1.amazonaws.com/237813277566dda64785067db96fb7bf3ade0dfaf6c4pp.jpg",
                },
            ],
            loyalty: LoyaltyProgram {
                enabled: true,
                threshold: 10,
                reward_description: "Corte Grátis",
            },
            policies: vec![
                "Cancelamento com 24h de antecedência.",
                "Tolerância de atraso de 10 minutos.",
                "No-show sujeito a taxa de 50% no próximo agendamento.",
            ],
        }
    }

    pub fn service(&self, id: &str) -> Option<&Service> {
        self.services.iter().find(|service| service.id == id)
    }

    pub fn professional(&self, id: &str) -> Option<&Professional> {
        self.professionals.iter().find(|professional| professional.id == id)
    }

    /// Combo services shown in the highlights carousel, entries with an
    /// image first.
    pub fn highlights(&self) -> Vec<&Service> {
        let mut combos: Vec<&Service> = self
            .services
            .iter()
            .filter(|service| service.category == HIGHLIGHT_CATEGORY)
            .collect();
        combos.sort_by_key(|service| service.image_url.is_none());
        combos
    }

    /// Remaining categories in first-seen order, combos excluded.
    pub fn categories(&self) -> Vec<&'static str> {
        let mut seen = Vec::new();
        for service in &self.services {
            if service.category != HIGHLIGHT_CATEGORY && !seen.contains(&service.category) {
                seen.push(service.category);
            }
        }
        seen
    }

    pub fn services_in(&self, category: &str) -> Vec<&Service> {
        self.services
            .iter()
            .filter(|service| service.category == category)
            .collect()
    }
}

fn service_catalog() -> Vec<Service> {
    vec![
        Service {
            id: "1",
            name: "Barba",
            description: "Modelagem e hidratação.",
            duration_min: 30,
            price: 25,
            category: "Barba",
            image_url: Some("https://images.unsplash.com/photo-1503951914875-befea74701c5?w=800&auto=format&fit=crop&q=60"),
        },
        Service {
            id: "2",
            name: "Barboterapia",
            description: "Barba com toalha quente e massagem.",
            duration_min: 30,
            price: 30,
            category: "Barba",
            image_url: Some("https://images.unsplash.com/photo-1621605815971-fbc98d665033?w=800&auto=format&fit=crop&q=60"),
        },
        Service {
            id: "3",
            name: "Corte",
            description: "Corte social ou moderno.",
            duration_min: 30,
            price: 35,
            category: "Cabelo",
            image_url: Some("https://images.unsplash.com/photo-1599351431202-1e0f0137899a?w=800&auto=format&fit=crop&q=60"),
        },
        Service {
            id: "11",
            name: "Freestyle",
            description: "Desenhos e arte no cabelo.",
            duration_min: 20,
            price: 25,
            category: "Cabelo",
            image_url: Some("https://images.unsplash.com/photo-1593702288056-40e697e62754?w=800&auto=format&fit=crop&q=60"),
        },
        Service {
            id: "15",
            name: "Platinado",
            description: "Descoloração global.",
            duration_min: 60,
            price: 180,
            category: "Química",
            image_url: Some("https://images.unsplash.com/photo-1616952936720-3b4787a71676?w=800&auto=format&fit=crop&q=60"),
        },
        Service {
            id: "4",
            name: "Corte + Barba",
            description: "Combo clássico.",
            duration_min: 60,
            price: 55,
            category: "Combos",
            image_url: Some("https://images.unsplash.com/photo-1599351431202-1e0f0137899a?w=800&auto=format&fit=crop&q=60"),
        },
        Service {
            id: "5",
            name: "Corte + Barba + Sobrancelhas",
            description: "Serviço completo.",
            duration_min: 60,
            price: 60,
            category: "Combos",
            image_url: Some("https://images.unsplash.com/photo-1621605815971-fbc98d665033?w=800&auto=format&fit=crop&q=60"),
        },
        Service {
            id: "6",
            name: "Corte + Barboterapia",
            description: "Corte e relaxamento facial.",
            duration_min: 60,
            price: 60,
            category: "Combos",
            image_url: Some("https://images.unsplash.com/photo-1503951914875-befea74701c5?w=800&auto=format&fit=crop&q=60"),
        },
        Service {
            id: "7",
            name: "Corte + Barboterapia + Sobrancelhas",
            description: "A experiência completa.",
            duration_min: 60,
            price: 65,
            category: "Combos",
            image_url: Some("https://images.unsplash.com/photo-1622286342621-4bd786c2447c?w=800&auto=format&fit=crop&q=60"),
        },
        Service {
            id: "8",
            name: "Corte + Freestyle",
            description: "Corte com arte.",
            duration_min: 30,
            price: 40,
            category: "Combos",
            image_url: Some("https://images.unsplash.com/photo-1593702288056-40e697e62754?w=800&auto=format&fit=crop&q=60"),
        },
        Service {
            id: "9",
            name: "Corte + Sobrancelhas",
            description: "Alinhamento do visual.",
            duration_min: 30,
            price: 40,
            category: "Combos",
            image_url: Some("https://images.unsplash.com/photo-1504812888631-4a41f6e2e505?w=800&auto=format&fit=crop&q=60"),
        },
        Service {
            id: "10",
            name: "Corte + Penteado",
            description: "Corte com finalização especial.",
            duration_min: 30,
            price: 45,
            category: "Combos",
            image_url: Some("https://images.unsplash.com/photo-1517832606299-7ae9b720a186?w=800&auto=format&fit=crop&q=60"),
        },
        Service {
            id: "16",
            name: "Platinado + Corte",
            description: "Visual totalmente novo.",
            duration_min: 60,
            price: 200,
            category: "Combos",
            image_url: Some("https://images.unsplash.com/photo-1616952936720-3b4787a71676?w=800&auto=format&fit=crop&q=60"),
        },
        Service {
            id: "17",
            name: "Platinado + Corte + Barba",
            description: "Transformação total.",
            duration_min: 120,
            price: 220,
            category: "Combos",
            image_url: Some("https://images.unsplash.com/photo-1582095133179-bfd08e2fc6b2?w=800&auto=format&fit=crop&q=60"),
        },
        Service {
            id: "18",
            name: "Platinado + Corte + Barboterapia",
            description: "Transformação com relaxamento.",
            duration_min: 120,
            price: 225,
            category: "Combos",
            image_url: Some("https://images.unsplash.com/photo-1534349762913-57a46984e77d?w=800&auto=format&fit=crop&q=60"),
        },
        Service {
            id: "12",
            name: "Hidratação",
            description: "Tratamento capilar profundo.",
            duration_min: 30,
            price: 25,
            category: "Tratamento",
            image_url: Some("https://images.unsplash.com/photo-1560066984-138dadb4c035?w=800&auto=format&fit=crop&q=60"),
        },
        Service {
            id: "13",
            name: "Penteado",
            description: "Modelagem para eventos.",
            duration_min: 15,
            price: 25,
            category: "Acabamento",
            image_url: Some("https://images.unsplash.com/photo-1522337360788-8b13dee7a37e?w=800&auto=format&fit=crop&q=60"),
        },
        Service {
            id: "14",
            name: "Pezinho",
            description: "Acabamento do corte.",
            duration_min: 15,
            price: 15,
            category: "Acabamento",
            image_url: Some("https://images.unsplash.com/photo-1503951914875-befea74701c5?w=800&auto=format&fit=crop&q=60"),
        },
        Service {
            id: "19",
            name: "Sobrancelhas",
            description: "Design na navalha.",
            duration_min: 15,
            price: 15,
            category: "Acabamento",
            image_url: Some("https://images.unsplash.com/photo-1596704017254-9b1b1c9c9c1c?w=800&auto=format&fit=crop&q=60"),
        },
    ]
}

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_EXAMPLE_COUNT: usize = 4;

/// Business categories offered on the form. Each carries a style guide that is
/// embedded in scene-synthesis prompts and a set of example scene descriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum IndustryCategory {
    #[default]
    RestaurantCafe,
    TechSaas,
    FashionApparel,
    HealthWellness,
    FinanceInsurance,
    RealEstate,
    RetailEcommerce,
    TravelHospitality,
}

impl IndustryCategory {
    pub fn all() -> &'static [IndustryCategory] {
        &[
            IndustryCategory::RestaurantCafe,
            IndustryCategory::TechSaas,
            IndustryCategory::FashionApparel,
            IndustryCategory::HealthWellness,
            IndustryCategory::FinanceInsurance,
            IndustryCategory::RealEstate,
            IndustryCategory::RetailEcommerce,
            IndustryCategory::TravelHospitality,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            IndustryCategory::RestaurantCafe => "Restaurant & Cafe",
            IndustryCategory::TechSaas => "Tech & SaaS",
            IndustryCategory::FashionApparel => "Fashion & Apparel",
            IndustryCategory::HealthWellness => "Health & Wellness",
            IndustryCategory::FinanceInsurance => "Finance & Insurance",
            IndustryCategory::RealEstate => "Real Estate",
            IndustryCategory::RetailEcommerce => "Retail & E-commerce",
            IndustryCategory::TravelHospitality => "Travel & Hospitality",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::all()
            .iter()
            .copied()
            .find(|category| category.label().eq_ignore_ascii_case(label))
    }

    /// Style guide embedded in the scene-synthesis prompt.
    pub fn style_guide(&self) -> &'static str {
        match self {
            IndustryCategory::RestaurantCafe => "The aesthetic should evoke feelings of warmth, appetite, and community. Use natural lighting, delicious-looking food, and inviting interior settings. For cafes, think cozy and artisanal. For restaurants, it can range from rustic and casual to elegant and fine-dining.",
            IndustryCategory::TechSaas => "The aesthetic must be clean, modern, and professional. Use imagery related to technology like laptops, smartphones, and abstract data visualizations. The mood should be innovative, efficient, and trustworthy. Minimalist settings and cool color palettes often work well.",
            IndustryCategory::FashionApparel => "The aesthetic should be stylish and aspirational. Focus on textures, fabrics, and the human form. Lighting should be flattering. The context can range from high-fashion editorial to casual streetwear. The logo should be presented as a premium brand element.",
            IndustryCategory::HealthWellness => "The aesthetic should feel calming, clean, and positive. Use natural elements, soft lighting, and serene environments. Imagery of nature, yoga, healthy food, or self-care products is appropriate. The mood should be rejuvenating and trustworthy.",
            IndustryCategory::FinanceInsurance => "The aesthetic must convey trust, security, and professionalism. Use clean lines, organized environments, and a corporate color palette (blues, grays). Imagery of people in business settings, documents, or abstract symbols of growth and protection is effective.",
            IndustryCategory::RealEstate => "The aesthetic should be aspirational, professional, and welcoming. Use images of beautiful homes, modern architecture, and happy families. The mood should convey a sense of trust and expertise in property. High-quality photography is key.",
            IndustryCategory::RetailEcommerce => "The aesthetic should be eye-catching and product-focused. The style can vary widely depending on the product, from playful and colorful to sleek and luxurious. The logo is a key part of the packaging and branding.",
            IndustryCategory::TravelHospitality => "The aesthetic should be evocative and inspiring, creating a sense of wanderlust or comfort. Use beautiful scenery, luxurious hotel interiors, or exciting destinations. The mood should be relaxing, adventurous, or welcoming, depending on the brand.",
        }
    }

    pub fn example_prompts(&self) -> &'static [&'static str] {
        match self {
            IndustryCategory::RestaurantCafe => &[
                "Macro shot of a logo on a ceramic coffee mug, steam gently rising, with a blurred, cozy cafe interior in the background.",
                "Flat lay of a menu with the logo debossed on its leather cover, placed on a dark slate surface next to a glass of red wine.",
                "A logo printed on a pizza box, shot from above, sitting on a kitchen counter with fresh ingredients like basil and tomatoes scattered around.",
                "Close-up of a logo embroidered on a black barista apron, with the person's hands preparing a latte in the background.",
                "A logo on a glass of craft beer with condensation, shot with a shallow depth of field against the warm, ambient light of a brewery.",
                "The logo printed on a paper food container for takeout, held by a person sitting on a park bench in the afternoon sun.",
                "A restaurant's logo etched onto a steak knife resting on a rustic wooden table, with a perfectly cooked steak slightly out of focus.",
                "Low-angle shot of a neon sign featuring the logo, glowing against a dark brick wall on a rainy city night.",
            ],
            IndustryCategory::TechSaas => &[
                "Close-up of a logo on a laptop screen, with the keyboard and a user's hands slightly blurred in the foreground in a sleek, minimalist office.",
                "A vibrant logo sticker on the back of a laptop, seen over the shoulder of a developer at a hackathon with the energetic glow of monitors.",
                "Logo displayed on a smartphone screen, held up to scan a QR code, with a clean, modern retail environment in the background.",
                "The logo projected onto a large screen during a tech conference keynote speech, with the speaker silhouetted in the foreground.",
                "A logo on a server rack in a data center, with blue and green LED lights creating a futuristic, high-tech atmosphere.",
                "An employee's ID card with the logo, worn on a lanyard in a bright, modern corporate campus hallway.",
                "Flat lay of a tablet showing the logo on screen, next to a stylus and a notebook on a clean white desk. Top-down, studio lighting.",
                "The logo subtly integrated into the UI of a futuristic heads-up display, seen from a first-person perspective.",
            ],
            IndustryCategory::FashionApparel => &[
                "Detailed close-up of a logo embroidered on the pocket of a premium denim jacket, with the fabric's texture highly visible against an urban brick wall.",
                "A luxury shopping bag with the logo in gold foil, held by a stylish person on a chic European city street with beautiful bokeh.",
                "The logo embossed on a leather patch on the back of a pair of high-end jeans. Shot with dramatic, shadowy lighting.",
                "A logo on the temple of a pair of sunglasses being worn by a model on a sun-drenched beach. The ocean is in the background.",
                "Close-up on the clasp of a designer handbag, where the logo is intricately engraved. The lighting is soft and luxurious.",
                "A logo printed on the chest of a hoodie, captured in a candid, high-energy street style photo in a city like Tokyo or New York.",
                "The logo on the sole of a sneaker, stepping into a puddle, creating a dynamic reflection. Shot from a very low angle.",
                "A woven label with the logo on the inside of a tailored wool coat. The shot is a macro detail, emphasizing quality and craftsmanship.",
            ],
            IndustryCategory::HealthWellness => &[
                "Low-angle shot of a logo on a frosted glass water bottle with condensation, sitting on a wooden floor next to a yoga mat in a sunlit studio.",
                "Top-down flat lay of a logo on a cosmetic jar, surrounded by natural ingredients like lavender sprigs on a white marble surface.",
                "The logo on the packaging of an organic tea box, placed on a rustic wooden table with a steaming cup of tea nearby. Soft morning light.",
                "A logo on the side of a reusable canvas tote bag filled with fresh produce from a farmer's market. Bright, natural lighting.",
                "Close-up of a logo on a bottle of essential oil, held in a person's hands. The background is a serene, out-of-focus natural landscape.",
                "The logo printed on a scented candle, with the flame lit, creating a warm and relaxing glow in a dimly lit, spa-like room.",
                "A fitness tracker on someone's wrist, with the logo displayed on the screen as they are on a mountain trail run at sunrise.",
                "The logo on the cover of a journal or planner, placed next to a succulent plant on a clean, organized desk.",
            ],
            IndustryCategory::FinanceInsurance => &[
                "A business card with the logo, resting against a laptop on a polished mahogany desk in a high-rise office with a blurred city skyline.",
                "The logo subtly etched onto the glass wall of a modern, secure boardroom, shot from a low angle to convey strength and stability.",
                "Close-up of a high-quality corporate pen with the logo engraved on its clip, lying on top of a signed contract document.",
                "A logo on the screen of a tablet displaying stock market data, with the trader's hands in motion in a fast-paced trading floor environment.",
                "The logo on the cover of an annual report, placed on a table in a bright, modern office lobby. The lighting is clean and professional.",
                "An umbrella with the logo, providing shelter to a family, symbolizing protection. Shot with a dramatic, cinematic feel.",
                "A credit card with the logo, captured in a macro shot, highlighting the details of the card's chip and texture.",
                "A logo on a digital welcome screen in the foyer of a sleek, architectural headquarters building. The perspective is wide, showing the scale.",
            ],
            IndustryCategory::RealEstate => &[
                "Close-up of a house key with the logo on a custom keychain, held in a hand unlocking a door. The welcoming front porch is blurred in the background.",
                "A logo on a sleek, modern 'For Sale' sign, shot from a low angle against a stunning architectural home at twilight with glowing interior lights.",
                "The logo watermarked on the corner of a beautiful architectural blueprint, laid out on a dark wood table with drafting tools.",
                "A welcome mat in front of an elegant front door, with the logo cleanly printed on it.",
                "The logo on the side of a folder being exchanged between a real estate agent and a happy couple, with their new home out of focus behind them.",
                "A drone shot looking down at a swimming pool of a luxury property, with the logo tastefully placed on a poolside lounge chair.",
                "The logo on a set of wine glasses, being used for a celebratory toast by new homeowners on their balcony overlooking a city view.",
                "A high-end property brochure with the logo on the cover, resting on the marble countertop of a brand new, luxurious kitchen.",
            ],
            IndustryCategory::RetailEcommerce => &[
                "An exciting unboxing experience shot from above. Hands are opening a branded shipping box with the logo on the inside lid. Soft studio lighting.",
                "A logo on a boutique's canvas tote bag, slung over the shoulder of a shopper browsing a vibrant farmer's market. Candid lifestyle shot.",
                "Close-up of a price tag with the logo, attached to a piece of clothing on a rack in a well-lit, trendy retail store.",
                "The logo printed on the side of a delivery van, captured with a motion blur effect as it drives through a bustling city street.",
                "A loyalty card with the logo, being handed over a counter by a friendly cashier. The background is a warm, inviting shop interior.",
                "The logo on a product box, sitting on a shelf surrounded by other beautifully designed packages. The lighting highlights the product.",
                "A person's hands typing on a laptop, with the e-commerce website showing the logo clearly in the header. The scene is cozy, perhaps at home.",
                "A branded gift card with the logo, artfully placed in a flat lay with tissue paper and a ribbon, ready to be gifted.",
            ],
            IndustryCategory::TravelHospitality => &[
                "Close-up of a leather luggage tag with the logo embossed on it, attached to a vintage suitcase in an opulent hotel lobby with warm bokeh.",
                "Logo embroidered on a fluffy white hotel towel, artfully folded on a bed in a sun-drenched room with a view of the ocean.",
                "The logo on a boarding pass being held by a traveler, with the blurred background of an airport departure gate and an airplane.",
                "A menu with the logo on it, sitting on a table at a resort's outdoor restaurant, overlooking a tropical sunset.",
                "The logo etched into a wooden sign at the entrance to a rustic mountain lodge, with snow-covered pines in the background.",
                "A passport with a custom cover showing the logo, placed on a map next to a compass and a camera. Adventurous flat lay.",
                "The logo on the sail of a boat, cruising on a crystal clear turquoise sea. The shot is bright, sunny, and aspirational.",
                "A room key card with the logo, held against the door of a hotel room, with the hallway stretching out in a cinematic perspective.",
            ],
        }
    }

    /// Picks `count` distinct example prompts in random order.
    pub fn sample_examples<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<&'static str> {
        self.example_prompts()
            .choose_multiple(rng, count)
            .copied()
            .collect()
    }
}

impl fmt::Display for IndustryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
